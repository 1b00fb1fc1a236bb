pub mod producto;
pub mod cliente;
pub mod proveedor;
pub mod venta;
pub mod cotizacion;
pub mod caja;
pub mod promocion;
pub mod tarea;
pub mod usuario;

pub use producto::*;
pub use cliente::*;
pub use proveedor::*;
pub use venta::*;
pub use cotizacion::*;
pub use caja::*;
pub use promocion::*;
pub use tarea::*;
pub use usuario::*;
