use serde::{Deserialize, Serialize};

/// Desglose de precio de un producto por peso:
/// - costo_material = peso_gramos * precio_gramo_material
/// - costo_hechura  = peso_gramos * precio_gramo_hechura
/// - precio_costo   = costo_material + costo_hechura
/// - precio_venta   = precio_costo + margen
///
/// El precio mínimo de venta NO se deriva de esta fórmula: lo fija el
/// usuario, salvo durante la cascada de tarifas (ver preservar_precio_minimo).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DesglosePrecio {
    pub costo_material: f64,
    pub costo_hechura: f64,
    pub precio_costo: f64,
    pub precio_venta: f64,
}

/// Cálculo puro del desglose. Peso o tarifas en cero producen costos en
/// cero, no es un error. Esta capa no valida negativos.
pub fn calcular_desglose(
    peso_gramos: f64,
    precio_gramo_material: f64,
    precio_gramo_hechura: f64,
    margen: f64,
) -> DesglosePrecio {
    let costo_material = peso_gramos * precio_gramo_material;
    let costo_hechura = peso_gramos * precio_gramo_hechura;
    let precio_costo = costo_material + costo_hechura;
    let precio_venta = precio_costo + margen;

    DesglosePrecio {
        costo_material,
        costo_hechura,
        precio_costo,
        precio_venta,
    }
}

/// Durante un cambio global de tarifas, el precio mínimo se recalcula
/// conservando la brecha (precio_venta - precio_minimo) que tenía el
/// producto, sin bajar de cero.
pub fn preservar_precio_minimo(
    nuevo_precio_venta: f64,
    precio_venta_anterior: f64,
    precio_minimo_anterior: f64,
) -> f64 {
    let brecha = precio_venta_anterior - precio_minimo_anterior;
    (nuevo_precio_venta - brecha).max(0.0)
}

/// Redondeo a 2 decimales para precios de presentación
pub fn redondear2(valor: f64) -> f64 {
    (valor * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desglose_formula() {
        // peso 10g, material 5/g, hechura 2/g, margen 30
        let d = calcular_desglose(10.0, 5.0, 2.0, 30.0);
        assert_eq!(d.costo_material, 50.0);
        assert_eq!(d.costo_hechura, 20.0);
        assert_eq!(d.precio_costo, 70.0);
        assert_eq!(d.precio_venta, 100.0);
    }

    #[test]
    fn test_desglose_es_idempotente() {
        let a = calcular_desglose(7.35, 3.2, 1.1, 12.5);
        let b = calcular_desglose(7.35, 3.2, 1.1, 12.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_peso_cero() {
        let d = calcular_desglose(0.0, 99.0, 42.0, 15.0);
        assert_eq!(d.costo_material, 0.0);
        assert_eq!(d.costo_hechura, 0.0);
        assert_eq!(d.precio_costo, 0.0);
        // solo queda el margen
        assert_eq!(d.precio_venta, 15.0);
    }

    #[test]
    fn test_tarifas_cero() {
        let d = calcular_desglose(25.0, 0.0, 0.0, 0.0);
        assert_eq!(d.precio_venta, 0.0);
    }

    #[test]
    fn test_preservar_brecha_minimo() {
        // venta 100, mínimo 80 => brecha 20; nueva venta 150 => mínimo 130
        assert_eq!(preservar_precio_minimo(150.0, 100.0, 80.0), 130.0);
    }

    #[test]
    fn test_minimo_no_baja_de_cero() {
        // brecha 90, nueva venta 50 => quedaría -40, se trunca en 0
        assert_eq!(preservar_precio_minimo(50.0, 100.0, 10.0), 0.0);
    }

    #[test]
    fn test_redondear2() {
        assert_eq!(redondear2(12.3456), 12.35);
        assert_eq!(redondear2(129.999), 130.0);
        assert_eq!(redondear2(3.14159), 3.14);
    }
}
