use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Venta {
    pub id: Option<i64>,
    pub numero: String,
    pub cliente_id: Option<i64>,
    pub fecha: Option<String>,
    pub subtotal: f64,
    pub descuento: f64,
    pub total: f64,
    pub forma_pago: String,
    pub monto_recibido: f64,
    pub cambio: f64,
    pub estado: String,
    pub usuario: Option<String>,
    pub observacion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VentaDetalle {
    pub id: Option<i64>,
    pub venta_id: Option<i64>,
    pub producto_id: i64,
    pub nombre_producto: Option<String>,
    pub cantidad: f64,
    pub precio_unitario: f64,
    pub descuento: f64,
    pub subtotal: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NuevaVenta {
    pub cliente_id: Option<i64>,
    pub items: Vec<VentaDetalle>,
    pub forma_pago: String,
    pub monto_recibido: f64,
    pub descuento: f64,
    pub observacion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VentaCompleta {
    pub venta: Venta,
    pub detalles: Vec<VentaDetalle>,
    pub cliente_nombre: Option<String>,
}
