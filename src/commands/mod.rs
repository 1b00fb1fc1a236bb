pub mod caja;
pub mod clientes;
pub mod config;
pub mod cotizaciones;
pub mod exportar;
pub mod inventario;
pub mod productos;
pub mod promociones;
pub mod proveedores;
pub mod reportes;
pub mod respaldo;
pub mod tareas;
pub mod usuarios;
pub mod ventas;
