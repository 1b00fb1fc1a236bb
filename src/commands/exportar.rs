use crate::db::Database;
use std::io::Write;
use tauri::State;

/// BOM UTF-8 para que Excel abra correctamente caracteres especiales
const BOM: &[u8] = b"\xEF\xBB\xBF";
/// Separador de columnas (punto y coma para Excel en español)
const SEP: &str = ";";

fn escapar_csv(valor: &str) -> String {
    if valor.contains(';') || valor.contains('"') || valor.contains('\n') {
        format!("\"{}\"", valor.replace('"', "\"\""))
    } else {
        valor.to_string()
    }
}

#[tauri::command]
pub fn exportar_ventas_csv(
    db: State<Database>,
    fecha_inicio: String,
    fecha_fin: String,
    ruta: String,
) -> Result<String, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT v.numero, v.fecha, c.nombre, v.forma_pago,
             v.subtotal, v.descuento, v.total, v.monto_recibido, v.cambio,
             v.usuario, v.estado
             FROM ventas v
             LEFT JOIN clientes c ON v.cliente_id = c.id
             WHERE date(v.fecha) BETWEEN date(?1) AND date(?2) AND v.anulada = 0
             ORDER BY v.fecha DESC",
        )
        .map_err(|e| e.to_string())?;

    let filas: Vec<Vec<String>> = stmt
        .query_map(rusqlite::params![fecha_inicio, fecha_fin], |row| {
            Ok(vec![
                row.get::<_, String>(0).unwrap_or_default(),
                row.get::<_, String>(1).unwrap_or_default(),
                row.get::<_, String>(2).unwrap_or("CONSUMIDOR FINAL".to_string()),
                row.get::<_, String>(3).unwrap_or_default(),
                format!("{:.2}", row.get::<_, f64>(4).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(5).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(6).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(7).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(8).unwrap_or(0.0)),
                row.get::<_, String>(9).unwrap_or_default(),
                row.get::<_, String>(10).unwrap_or_default(),
            ])
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let mut file = std::fs::File::create(&ruta).map_err(|e| e.to_string())?;
    file.write_all(BOM).map_err(|e| e.to_string())?;

    let headers = [
        "Numero", "Fecha", "Cliente", "Forma Pago", "Subtotal",
        "Descuento", "Total", "Recibido", "Cambio", "Usuario", "Estado",
    ];
    writeln!(file, "{}", headers.join(SEP)).map_err(|e| e.to_string())?;

    for fila in &filas {
        let linea: Vec<String> = fila.iter().map(|v| escapar_csv(v)).collect();
        writeln!(file, "{}", linea.join(SEP)).map_err(|e| e.to_string())?;
    }

    Ok(format!("{} ventas exportadas", filas.len()))
}

#[tauri::command]
pub fn exportar_inventario_csv(db: State<Database>, ruta: String) -> Result<String, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT p.codigo, p.codigo_barras, p.nombre, COALESCE(c.nombre, ''),
             COALESCE(d.nombre, ''), p.peso_gramos,
             p.costo_material, p.costo_hechura, p.precio_costo,
             p.precio_venta, p.precio_minimo,
             p.stock_actual, p.stock_minimo,
             CASE WHEN p.es_compuesto = 1 THEN 'Si' ELSE 'No' END
             FROM productos p
             LEFT JOIN categorias c ON p.categoria_id = c.id
             LEFT JOIN depositos d ON p.deposito_id = d.id
             WHERE p.activo = 1
             ORDER BY p.nombre",
        )
        .map_err(|e| e.to_string())?;

    let filas: Vec<Vec<String>> = stmt
        .query_map([], |row| {
            Ok(vec![
                row.get::<_, String>(0).unwrap_or_default(),
                row.get::<_, String>(1).unwrap_or_default(),
                row.get::<_, String>(2).unwrap_or_default(),
                row.get::<_, String>(3).unwrap_or_default(),
                row.get::<_, String>(4).unwrap_or_default(),
                format!("{:.3}", row.get::<_, f64>(5).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(6).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(7).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(8).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(9).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(10).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(11).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(12).unwrap_or(0.0)),
                row.get::<_, String>(13).unwrap_or_default(),
            ])
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let mut file = std::fs::File::create(&ruta).map_err(|e| e.to_string())?;
    file.write_all(BOM).map_err(|e| e.to_string())?;

    let headers = [
        "Codigo", "Codigo Barras", "Nombre", "Categoria", "Deposito",
        "Peso (g)", "Costo Material", "Costo Hechura", "P. Costo",
        "P. Venta", "P. Minimo", "Stock Actual", "Stock Minimo", "Compuesto",
    ];
    writeln!(file, "{}", headers.join(SEP)).map_err(|e| e.to_string())?;

    for fila in &filas {
        let linea: Vec<String> = fila.iter().map(|v| escapar_csv(v)).collect();
        writeln!(file, "{}", linea.join(SEP)).map_err(|e| e.to_string())?;
    }

    Ok(format!("{} productos exportados", filas.len()))
}

/// Guarda un texto en un archivo (usado para exportar reportes, etc.)
#[tauri::command]
pub fn guardar_archivo_texto(ruta: String, contenido: String) -> Result<(), String> {
    std::fs::write(&ruta, contenido.as_bytes())
        .map_err(|e| format!("Error guardando archivo: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapar_valor_simple() {
        assert_eq!(escapar_csv("ANILLO ORO"), "ANILLO ORO");
    }

    #[test]
    fn test_escapar_con_separador() {
        assert_eq!(escapar_csv("a;b"), "\"a;b\"");
    }

    #[test]
    fn test_escapar_comillas() {
        assert_eq!(escapar_csv("dije \"sol\""), "\"dije \"\"sol\"\"\"");
    }
}
