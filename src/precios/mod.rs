pub mod calculadora;
pub mod codigo_barras;
pub mod compuesto;
pub mod promocion;

pub use calculadora::{calcular_desglose, preservar_precio_minimo, redondear2, DesglosePrecio};
pub use codigo_barras::generar_codigo_barras;
pub use compuesto::{costo_compuesto, precio_sugerido, Componente};
pub use promocion::{precio_con_promocion, promocion_activa};
