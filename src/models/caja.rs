use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Caja {
    pub id: Option<i64>,
    pub fecha_apertura: Option<String>,
    pub fecha_cierre: Option<String>,
    pub monto_inicial: f64,
    pub monto_ventas: f64,
    pub monto_esperado: f64,
    pub monto_real: Option<f64>,
    pub diferencia: Option<f64>,
    pub estado: String,
    pub usuario: Option<String>,
    pub usuario_id: Option<i64>,
    pub observacion: Option<String>,
}

/// Movimiento manual de caja: INGRESO o EGRESO
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MovimientoCaja {
    pub id: Option<i64>,
    pub caja_id: i64,
    pub tipo: String,
    pub descripcion: String,
    pub monto: f64,
    pub fecha: Option<String>,
    pub usuario: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResumenCaja {
    pub caja: Caja,
    pub total_ventas: f64,
    pub num_ventas: i64,
    pub total_efectivo: f64,
    pub total_ingresos: f64,
    pub total_egresos: f64,
}
