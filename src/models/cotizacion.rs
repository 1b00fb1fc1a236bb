use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Cotizacion {
    pub id: Option<i64>,
    pub numero: String,
    pub cliente_id: Option<i64>,
    pub fecha: Option<String>,
    pub valida_hasta: Option<String>,
    pub subtotal: f64,
    pub descuento: f64,
    pub total: f64,
    pub estado: String,
    pub venta_id: Option<i64>,
    pub usuario: Option<String>,
    pub observacion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CotizacionDetalle {
    pub id: Option<i64>,
    pub cotizacion_id: Option<i64>,
    pub producto_id: i64,
    pub nombre_producto: Option<String>,
    pub cantidad: f64,
    pub precio_unitario: f64,
    pub descuento: f64,
    pub subtotal: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NuevaCotizacion {
    pub cliente_id: Option<i64>,
    pub items: Vec<CotizacionDetalle>,
    pub descuento: f64,
    pub valida_hasta: Option<String>,
    pub observacion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CotizacionCompleta {
    pub cotizacion: Cotizacion,
    pub detalles: Vec<CotizacionDetalle>,
    pub cliente_nombre: Option<String>,
}
