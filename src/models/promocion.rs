use serde::{Deserialize, Serialize};

/// Promoción sobre un producto. Tipos: PORCENTAJE, MONTO_FIJO, COMBO.
/// Está activa si la fecha actual cae dentro de [fecha_inicio, fecha_fin],
/// ambos extremos inclusive.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Promocion {
    pub id: Option<i64>,
    pub producto_id: i64,
    pub producto_nombre: Option<String>,
    pub tipo: String,
    pub valor: f64,
    pub fecha_inicio: String,
    pub fecha_fin: String,
    pub descripcion: Option<String>,
    pub activo: bool,
}

/// Precio efectivo de un producto considerando su promoción vigente
#[derive(Debug, Serialize, Deserialize)]
pub struct PrecioVigente {
    pub producto_id: i64,
    pub precio_venta: f64,
    pub precio_efectivo: f64,
    pub promocion_id: Option<i64>,
    pub promocion_tipo: Option<String>,
}
