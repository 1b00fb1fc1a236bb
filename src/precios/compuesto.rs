use serde::{Deserialize, Serialize};

use super::calculadora::redondear2;

/// Componente de un producto compuesto. Se persiste como columna JSON en la
/// fila del producto; el costo se calcula una sola vez al crear el compuesto
/// y no se recalcula si luego cambia el precio del componente.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Componente {
    pub producto_id: i64,
    pub cantidad: f64,
    /// Costo unitario del componente al momento de armar el compuesto
    pub precio_costo: f64,
}

/// Costo de compra del compuesto: suma de (costo unitario * cantidad)
pub fn costo_compuesto(componentes: &[Componente]) -> f64 {
    componentes
        .iter()
        .map(|c| c.precio_costo * c.cantidad)
        .sum()
}

/// Precio de venta sugerido: costo con 30% de recargo, a 2 decimales.
/// Solo se usa si el usuario no indica un precio manual.
pub fn precio_sugerido(costo: f64) -> f64 {
    redondear2(costo * 1.3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(producto_id: i64, cantidad: f64, precio_costo: f64) -> Componente {
        Componente {
            producto_id,
            cantidad,
            precio_costo,
        }
    }

    #[test]
    fn test_costo_suma_componentes() {
        let comps = vec![comp(1, 2.0, 15.0), comp(2, 1.0, 40.0), comp(3, 3.0, 5.0)];
        // 30 + 40 + 15 = 85
        assert!((costo_compuesto(&comps) - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_costo_sin_componentes() {
        assert_eq!(costo_compuesto(&[]), 0.0);
    }

    #[test]
    fn test_precio_sugerido_30_por_ciento() {
        assert!((precio_sugerido(100.0) - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_precio_sugerido_redondeado() {
        // 33.33 * 1.3 = 43.329 => 43.33
        assert!((precio_sugerido(33.33) - 43.33).abs() < 1e-9);
    }
}
