/// Una promoción está vigente si `ahora` cae dentro de
/// [fecha_inicio, fecha_fin], ambos extremos inclusive. Las fechas se
/// comparan como texto en formato ISO (YYYY-MM-DD), igual que las guarda
/// SQLite.
pub fn promocion_activa(fecha_inicio: &str, fecha_fin: &str, ahora: &str) -> bool {
    let inicio = &fecha_inicio[..fecha_inicio.len().min(10)];
    let fin = &fecha_fin[..fecha_fin.len().min(10)];
    let hoy = &ahora[..ahora.len().min(10)];
    inicio <= hoy && hoy <= fin
}

/// Precio efectivo de un producto con promoción:
/// - PORCENTAJE: precio * (1 - valor/100)
/// - MONTO_FIJO: precio - valor, truncado en 0 (nunca un precio negativo)
/// - COMBO: el precio unitario no cambia
///
/// Un tipo desconocido deja el precio intacto.
pub fn precio_con_promocion(precio_venta: f64, tipo: &str, valor: f64) -> f64 {
    match tipo {
        "PORCENTAJE" => precio_venta * (1.0 - valor / 100.0),
        "MONTO_FIJO" => (precio_venta - valor).max(0.0),
        _ => precio_venta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_porcentaje() {
        // 100 con 20% => 80
        assert!((precio_con_promocion(100.0, "PORCENTAJE", 20.0) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_monto_fijo() {
        assert!((precio_con_promocion(50.0, "MONTO_FIJO", 10.0) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_monto_fijo_no_negativo() {
        // descuento mayor al precio: se trunca en 0
        assert_eq!(precio_con_promocion(50.0, "MONTO_FIJO", 70.0), 0.0);
    }

    #[test]
    fn test_combo_no_altera_precio_unitario() {
        assert_eq!(precio_con_promocion(100.0, "COMBO", 5.0), 100.0);
    }

    #[test]
    fn test_tipo_desconocido() {
        assert_eq!(precio_con_promocion(100.0, "OTRO", 50.0), 100.0);
    }

    #[test]
    fn test_vigencia_inclusiva() {
        // ambos extremos cuentan como vigente
        assert!(promocion_activa("2026-03-01", "2026-03-31", "2026-03-01"));
        assert!(promocion_activa("2026-03-01", "2026-03-31", "2026-03-31"));
        assert!(promocion_activa("2026-03-01", "2026-03-31", "2026-03-15"));
    }

    #[test]
    fn test_fuera_de_vigencia() {
        assert!(!promocion_activa("2026-03-01", "2026-03-31", "2026-02-28"));
        assert!(!promocion_activa("2026-03-01", "2026-03-31", "2026-04-01"));
    }

    #[test]
    fn test_vigencia_con_hora() {
        // fechas con hora (datetime de SQLite) se comparan por su día
        assert!(promocion_activa("2026-03-01", "2026-03-31", "2026-03-31 23:59:59"));
    }
}
