use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Producto {
    pub id: Option<i64>,
    pub codigo: Option<String>,
    pub codigo_barras: Option<String>,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria_id: Option<i64>,
    pub deposito_id: Option<i64>,
    pub peso_gramos: f64,
    pub costo_material: f64,
    pub costo_hechura: f64,
    pub margen: f64,
    pub precio_costo: f64,
    pub precio_venta: f64,
    pub precio_minimo: f64,
    pub stock_actual: f64,
    pub stock_minimo: f64,
    pub es_compuesto: bool,
    pub componentes: Option<Vec<crate::precios::Componente>>,
    pub activo: bool,
}

/// Fila ligera para listados y búsqueda (sin desglose de costos)
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductoBusqueda {
    pub id: i64,
    pub codigo: Option<String>,
    pub codigo_barras: Option<String>,
    pub nombre: String,
    pub peso_gramos: f64,
    pub precio_venta: f64,
    pub precio_minimo: f64,
    pub stock_actual: f64,
    pub stock_minimo: f64,
    pub categoria_nombre: Option<String>,
    pub deposito_nombre: Option<String>,
    pub es_compuesto: bool,
}

/// Datos para crear un producto compuesto (bundle)
#[derive(Debug, Serialize, Deserialize)]
pub struct NuevoCompuesto {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria_id: Option<i64>,
    pub deposito_id: Option<i64>,
    pub componentes: Vec<crate::precios::Componente>,
    /// Si no se indica, se sugiere costo * 1.3 redondeado a 2 decimales
    pub precio_venta_manual: Option<f64>,
    pub stock_inicial: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Categoria {
    pub id: Option<i64>,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub activo: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Deposito {
    pub id: Option<i64>,
    pub nombre: String,
    pub direccion: Option<String>,
    pub activo: bool,
}
