/// Genera el código de barras EAN-13 de uso interno para un producto.
///
/// Estructura (12 dígitos + 1 dígito verificador):
/// - Posiciones 1-3:   prefijo 200 (rango reservado para uso interno)
/// - Posiciones 4-12:  secuencial (9 dígitos, contador monotónico en config)
/// - Posición 13:      dígito verificador (módulo 10)
///
/// Al derivarse de un contador monotónico el código es único por
/// construcción: no hay reintentos ni colisiones que manejar.
pub fn generar_codigo_barras(secuencial: i64) -> String {
    let base = format!("200{:09}", secuencial.max(0) % 1_000_000_000);
    let dv = digito_verificador_ean13(&base);
    format!("{}{}", base, dv)
}

/// Dígito verificador EAN-13: los 12 dígitos se ponderan alternando
/// 1 y 3 de izquierda a derecha, y el verificador completa la suma al
/// siguiente múltiplo de 10.
fn digito_verificador_ean13(cadena: &str) -> u32 {
    let suma: u32 = cadena
        .chars()
        .enumerate()
        .map(|(i, ch)| {
            let digito = ch.to_digit(10).unwrap_or(0);
            if i % 2 == 0 {
                digito
            } else {
                digito * 3
            }
        })
        .sum();

    (10 - suma % 10) % 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digito_verificador_conocido() {
        // EAN real: 4006381333931 (el verificador de 400638133393 es 1)
        assert_eq!(digito_verificador_ean13("400638133393"), 1);
    }

    #[test]
    fn test_longitud_y_digitos() {
        let codigo = generar_codigo_barras(1);
        assert_eq!(codigo.len(), 13);
        assert!(codigo.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_estructura() {
        let codigo = generar_codigo_barras(123);
        assert_eq!(&codigo[0..3], "200");
        assert_eq!(&codigo[3..12], "000000123");
    }

    #[test]
    fn test_unicidad_por_secuencial() {
        // secuenciales distintos producen códigos distintos
        let codigos: Vec<String> = (1..=500).map(generar_codigo_barras).collect();
        for (i, a) in codigos.iter().enumerate() {
            for b in codigos.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_verificador_valido() {
        // el dígito 13 debe cerrar la suma ponderada en múltiplo de 10
        for sec in [1_i64, 42, 999, 1_000_000] {
            let codigo = generar_codigo_barras(sec);
            let suma: u32 = codigo
                .chars()
                .enumerate()
                .map(|(i, ch)| {
                    let d = ch.to_digit(10).unwrap();
                    if i % 2 == 0 {
                        d
                    } else {
                        d * 3
                    }
                })
                .sum();
            assert_eq!(suma % 10, 0);
        }
    }
}
