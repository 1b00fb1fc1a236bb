use crate::db::{Database, SesionState};
use crate::precios::{calcular_desglose, preservar_precio_minimo};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tauri::State;

/// Obtiene toda la configuración como un mapa clave-valor
#[tauri::command]
pub fn obtener_config(db: State<Database>) -> Result<HashMap<String, String>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare("SELECT key, value FROM config")
        .map_err(|e| e.to_string())?;

    let config: HashMap<String, String> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(|e| e.to_string())?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(config)
}

/// Guarda un conjunto de claves de configuración. Las claves secuenciales
/// son internas y no se aceptan desde el frontend.
#[tauri::command]
pub fn guardar_config(
    db: State<Database>,
    sesion: State<SesionState>,
    valores: HashMap<String, String>,
) -> Result<(), String> {
    crate::commands::usuarios::verificar_admin(&sesion)?;

    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    for (clave, valor) in &valores {
        if clave.starts_with("secuencial_") {
            return Err(format!("La clave '{}' es interna y no se puede modificar", clave));
        }
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            rusqlite::params![clave, valor],
        )
        .map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Resultado de la cascada de tarifas por gramo
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResultadoCascada {
    pub total_productos: i64,
    pub actualizados: i64,
    pub omitidos: Vec<ProductoOmitido>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProductoOmitido {
    pub producto_id: i64,
    pub codigo: String,
    pub motivo: String,
}

/// Actualiza las tarifas por gramo y recalcula en cascada los precios de
/// todos los productos simples activos. Todo corre en una sola transacción:
/// si algo falla, ni las tarifas ni los precios cambian.
#[tauri::command]
pub fn actualizar_precios_gramo(
    db: State<Database>,
    sesion: State<SesionState>,
    precio_gramo_material: f64,
    precio_gramo_hechura: f64,
) -> Result<ResultadoCascada, String> {
    crate::commands::usuarios::verificar_admin(&sesion)?;

    if precio_gramo_material < 0.0 || precio_gramo_hechura < 0.0 {
        return Err("Las tarifas por gramo no pueden ser negativas".to_string());
    }

    let mut conn = db.conn.lock().map_err(|e| e.to_string())?;

    aplicar_cascada_tarifas(&mut conn, precio_gramo_material, precio_gramo_hechura)
        .map_err(|e| e.to_string())
}

/// Núcleo de la cascada, separado del comando para poder ejecutarlo
/// sobre una conexión directa.
pub(crate) fn aplicar_cascada_tarifas(
    conn: &mut Connection,
    tarifa_material: f64,
    tarifa_hechura: f64,
) -> Result<ResultadoCascada, rusqlite::Error> {
    let tx = conn.transaction()?;

    tx.execute(
        "UPDATE config SET value = ?1 WHERE key = 'precio_gramo_material'",
        rusqlite::params![tarifa_material.to_string()],
    )?;
    tx.execute(
        "UPDATE config SET value = ?1 WHERE key = 'precio_gramo_hechura'",
        rusqlite::params![tarifa_hechura.to_string()],
    )?;

    // Candidatos: productos simples activos. Los compuestos conservan su
    // costo congelado al momento de la composición.
    let productos: Vec<(i64, String, f64, f64, f64, f64)> = {
        let mut stmt = tx.prepare(
            "SELECT id, codigo, peso_gramos, margen, precio_venta, precio_minimo
             FROM productos WHERE activo = 1 AND es_compuesto = 0",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    let total_productos = productos.len() as i64;
    let mut actualizados = 0i64;
    let mut omitidos = Vec::new();

    for (id, codigo, peso, margen, venta_anterior, minimo_anterior) in productos {
        if peso <= 0.0 {
            omitidos.push(ProductoOmitido {
                producto_id: id,
                codigo,
                motivo: "Sin peso registrado".to_string(),
            });
            continue;
        }

        let desglose = calcular_desglose(peso, tarifa_material, tarifa_hechura, margen);
        let nuevo_minimo =
            preservar_precio_minimo(desglose.precio_venta, venta_anterior, minimo_anterior);

        tx.execute(
            "UPDATE productos SET
                costo_material = ?1, costo_hechura = ?2,
                precio_costo = ?3, precio_venta = ?4, precio_minimo = ?5,
                updated_at = datetime('now', 'localtime')
             WHERE id = ?6",
            rusqlite::params![
                desglose.costo_material,
                desglose.costo_hechura,
                desglose.precio_costo,
                desglose.precio_venta,
                nuevo_minimo,
                id
            ],
        )?;
        actualizados += 1;
    }

    tx.commit()?;

    Ok(ResultadoCascada {
        total_productos,
        actualizados,
        omitidos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn insertar_producto(
        conn: &Connection,
        codigo: &str,
        peso: f64,
        margen: f64,
        venta: f64,
        minimo: f64,
        es_compuesto: bool,
    ) -> i64 {
        conn.execute(
            "INSERT INTO productos
                (codigo, nombre, peso_gramos, margen, precio_venta, precio_minimo,
                 es_compuesto, activo)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1)",
            rusqlite::params![
                codigo,
                format!("PRODUCTO {}", codigo),
                peso,
                margen,
                venta,
                minimo,
                es_compuesto as i64
            ],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[test]
    fn test_cascada_recalcula_precios() {
        let db = Database::new_en_memoria().unwrap();
        let mut conn = db.conn.lock().unwrap();

        // peso 10g, margen 30; con tarifas 5/2 => venta 100
        let id = insertar_producto(&conn, "AN-001", 10.0, 30.0, 100.0, 80.0, false);

        let res = aplicar_cascada_tarifas(&mut conn, 6.0, 3.0).unwrap();
        assert_eq!(res.total_productos, 1);
        assert_eq!(res.actualizados, 1);
        assert!(res.omitidos.is_empty());

        let (venta, minimo, costo): (f64, f64, f64) = conn
            .query_row(
                "SELECT precio_venta, precio_minimo, precio_costo FROM productos WHERE id = ?1",
                rusqlite::params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();

        // nueva venta = 10*(6+3) + 30 = 120; brecha 20 => mínimo 100
        assert_eq!(costo, 90.0);
        assert_eq!(venta, 120.0);
        assert_eq!(minimo, 100.0);
    }

    #[test]
    fn test_cascada_omite_sin_peso_y_compuestos() {
        let db = Database::new_en_memoria().unwrap();
        let mut conn = db.conn.lock().unwrap();

        insertar_producto(&conn, "SRV-01", 0.0, 10.0, 10.0, 10.0, false);
        insertar_producto(&conn, "SET-01", 15.0, 0.0, 200.0, 180.0, true);

        let res = aplicar_cascada_tarifas(&mut conn, 4.0, 1.0).unwrap();

        // El compuesto ni siquiera es candidato
        assert_eq!(res.total_productos, 1);
        assert_eq!(res.actualizados, 0);
        assert_eq!(res.omitidos.len(), 1);
        assert_eq!(res.omitidos[0].codigo, "SRV-01");

        // El compuesto conserva su precio
        let venta: f64 = conn
            .query_row(
                "SELECT precio_venta FROM productos WHERE codigo = 'SET-01'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(venta, 200.0);
    }

    #[test]
    fn test_cascada_actualiza_tarifas_en_config() {
        let db = Database::new_en_memoria().unwrap();
        let mut conn = db.conn.lock().unwrap();

        aplicar_cascada_tarifas(&mut conn, 7.5, 2.25).unwrap();

        let material: String = conn
            .query_row(
                "SELECT value FROM config WHERE key = 'precio_gramo_material'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(material, "7.5");
    }
}
