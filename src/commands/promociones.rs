use crate::db::Database;
use crate::models::{PrecioVigente, Promocion};
use crate::precios;
use rusqlite::Connection;
use tauri::State;

const TIPOS_VALIDOS: [&str; 3] = ["PORCENTAJE", "MONTO_FIJO", "COMBO"];

#[tauri::command]
pub fn crear_promocion(db: State<Database>, promocion: Promocion) -> Result<i64, String> {
    validar_promocion(&promocion)?;

    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    // El producto debe existir; la superposición de promociones no se
    // restringe: al consultar gana la primera vigente por fecha de inicio
    let existe: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM productos WHERE id = ?1 AND activo = 1",
            rusqlite::params![promocion.producto_id],
            |row| row.get::<_, i64>(0),
        )
        .map(|c| c > 0)
        .unwrap_or(false);

    if !existe {
        return Err("El producto de la promoción no existe o está inactivo".to_string());
    }

    conn.execute(
        "INSERT INTO promociones (producto_id, tipo, valor, fecha_inicio, fecha_fin, descripcion, activo)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            promocion.producto_id,
            promocion.tipo,
            promocion.valor,
            promocion.fecha_inicio,
            promocion.fecha_fin,
            promocion.descripcion,
            promocion.activo as i32,
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(conn.last_insert_rowid())
}

#[tauri::command]
pub fn actualizar_promocion(db: State<Database>, promocion: Promocion) -> Result<(), String> {
    validar_promocion(&promocion)?;
    let id = promocion.id.ok_or("ID requerido para actualizar")?;

    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let afectadas = conn
        .execute(
            "UPDATE promociones SET producto_id=?1, tipo=?2, valor=?3, fecha_inicio=?4,
             fecha_fin=?5, descripcion=?6, activo=?7
             WHERE id=?8",
            rusqlite::params![
                promocion.producto_id,
                promocion.tipo,
                promocion.valor,
                promocion.fecha_inicio,
                promocion.fecha_fin,
                promocion.descripcion,
                promocion.activo as i32,
                id,
            ],
        )
        .map_err(|e| e.to_string())?;

    if afectadas == 0 {
        return Err("Promoción no encontrada".to_string());
    }
    Ok(())
}

#[tauri::command]
pub fn listar_promociones(db: State<Database>) -> Result<Vec<Promocion>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT pr.id, pr.producto_id, p.nombre, pr.tipo, pr.valor, pr.fecha_inicio,
             pr.fecha_fin, pr.descripcion, pr.activo
             FROM promociones pr
             JOIN productos p ON pr.producto_id = p.id
             ORDER BY pr.fecha_inicio DESC",
        )
        .map_err(|e| e.to_string())?;

    let promociones = stmt
        .query_map([], mapear_promocion)
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(promociones)
}

#[tauri::command]
pub fn eliminar_promocion(db: State<Database>, id: i64) -> Result<(), String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let afectadas = conn
        .execute(
            "DELETE FROM promociones WHERE id = ?1",
            rusqlite::params![id],
        )
        .map_err(|e| e.to_string())?;

    if afectadas == 0 {
        return Err("Promoción no encontrada".to_string());
    }
    Ok(())
}

/// Promociones vigentes hoy (ambos extremos de fecha inclusive)
#[tauri::command]
pub fn promociones_activas(db: State<Database>) -> Result<Vec<Promocion>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let hoy = fecha_hoy(&conn).map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT pr.id, pr.producto_id, p.nombre, pr.tipo, pr.valor, pr.fecha_inicio,
             pr.fecha_fin, pr.descripcion, pr.activo
             FROM promociones pr
             JOIN productos p ON pr.producto_id = p.id
             WHERE pr.activo = 1
             ORDER BY pr.fecha_inicio",
        )
        .map_err(|e| e.to_string())?;

    let mut promociones = stmt
        .query_map([], mapear_promocion)
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    promociones.retain(|pr| precios::promocion_activa(&pr.fecha_inicio, &pr.fecha_fin, &hoy));

    Ok(promociones)
}

fn fecha_hoy(conn: &Connection) -> Result<String, rusqlite::Error> {
    conn.query_row("SELECT date('now','localtime')", [], |row| row.get(0))
}

/// Primera promoción vigente del producto, ordenada por fecha de inicio.
/// La ventana inclusiva la decide precios::promocion_activa, única autoridad
/// sobre la vigencia.
pub(crate) fn promocion_vigente(
    conn: &Connection,
    producto_id: i64,
) -> Result<Option<(i64, String, f64)>, rusqlite::Error> {
    let hoy = fecha_hoy(conn)?;

    let mut stmt = conn.prepare(
        "SELECT id, tipo, valor, fecha_inicio, fecha_fin FROM promociones
         WHERE producto_id = ?1 AND activo = 1
         ORDER BY fecha_inicio",
    )?;

    let promos = stmt.query_map(rusqlite::params![producto_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, f64>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    for promo in promos {
        let (id, tipo, valor, inicio, fin) = promo?;
        if precios::promocion_activa(&inicio, &fin, &hoy) {
            return Ok(Some((id, tipo, valor)));
        }
    }

    Ok(None)
}

/// Precio efectivo de un producto aplicando su promoción vigente, si la hay
#[tauri::command]
pub fn precio_vigente_producto(db: State<Database>, producto_id: i64) -> Result<PrecioVigente, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let precio_venta: f64 = conn
        .query_row(
            "SELECT precio_venta FROM productos WHERE id = ?1",
            rusqlite::params![producto_id],
            |row| row.get(0),
        )
        .map_err(|_| "Producto no encontrado".to_string())?;

    match promocion_vigente(&conn, producto_id).map_err(|e| e.to_string())? {
        Some((promo_id, tipo, valor)) => Ok(PrecioVigente {
            producto_id,
            precio_venta,
            precio_efectivo: precios::precio_con_promocion(precio_venta, &tipo, valor),
            promocion_id: Some(promo_id),
            promocion_tipo: Some(tipo),
        }),
        None => Ok(PrecioVigente {
            producto_id,
            precio_venta,
            precio_efectivo: precio_venta,
            promocion_id: None,
            promocion_tipo: None,
        }),
    }
}

fn validar_promocion(promocion: &Promocion) -> Result<(), String> {
    if !TIPOS_VALIDOS.contains(&promocion.tipo.as_str()) {
        return Err(format!("Tipo de promoción no válido: {}", promocion.tipo));
    }
    if promocion.valor < 0.0 {
        return Err("El valor de la promoción no puede ser negativo".to_string());
    }
    if promocion.tipo == "PORCENTAJE" && promocion.valor > 100.0 {
        return Err("El porcentaje de descuento no puede superar 100".to_string());
    }
    if promocion.fecha_inicio.is_empty() || promocion.fecha_fin.is_empty() {
        return Err("Debe indicar fecha de inicio y de fin".to_string());
    }
    if promocion.fecha_fin < promocion.fecha_inicio {
        return Err("La fecha de fin no puede ser anterior a la de inicio".to_string());
    }
    Ok(())
}

fn mapear_promocion(row: &rusqlite::Row) -> Result<Promocion, rusqlite::Error> {
    Ok(Promocion {
        id: Some(row.get(0)?),
        producto_id: row.get(1)?,
        producto_nombre: row.get(2)?,
        tipo: row.get(3)?,
        valor: row.get(4)?,
        fecha_inicio: row.get(5)?,
        fecha_fin: row.get(6)?,
        descripcion: row.get(7)?,
        activo: row.get::<_, i32>(8)? != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn insertar_producto(conn: &Connection, precio_venta: f64) -> i64 {
        conn.execute(
            "INSERT INTO productos (codigo, nombre, precio_venta, activo)
             VALUES ('AN-020', 'ANILLO PROMO', ?1, 1)",
            rusqlite::params![precio_venta],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    fn insertar_promocion(
        conn: &Connection,
        producto_id: i64,
        tipo: &str,
        valor: f64,
        inicio: &str,
        fin: &str,
        activo: i32,
    ) -> i64 {
        conn.execute(
            "INSERT INTO promociones (producto_id, tipo, valor, fecha_inicio, fecha_fin, activo)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![producto_id, tipo, valor, inicio, fin, activo],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[test]
    fn test_con_solapamiento_gana_la_promocion_que_empezo_primero() {
        let db = Database::new_en_memoria().unwrap();
        let conn = db.conn.lock().unwrap();
        let producto_id = insertar_producto(&conn, 100.0);

        // Dos promociones vigentes a la vez; la más antigua por fecha de
        // inicio es la que se aplica
        let temprana_id = insertar_promocion(
            &conn, producto_id, "PORCENTAJE", 20.0, "2020-01-01", "2999-12-31", 1,
        );
        insertar_promocion(
            &conn, producto_id, "MONTO_FIJO", 5.0, "2021-06-15", "2999-12-31", 1,
        );

        let (id, tipo, valor) = promocion_vigente(&conn, producto_id).unwrap().unwrap();
        assert_eq!(id, temprana_id);
        assert_eq!(tipo, "PORCENTAJE");
        assert_eq!(valor, 20.0);
        assert_eq!(precios::precio_con_promocion(100.0, &tipo, valor), 80.0);
    }

    #[test]
    fn test_vencidas_e_inactivas_no_cuentan() {
        let db = Database::new_en_memoria().unwrap();
        let conn = db.conn.lock().unwrap();
        let producto_id = insertar_producto(&conn, 100.0);

        // Vencida, inactiva y futura: ninguna vigente
        insertar_promocion(
            &conn, producto_id, "PORCENTAJE", 10.0, "2020-01-01", "2020-12-31", 1,
        );
        insertar_promocion(
            &conn, producto_id, "PORCENTAJE", 15.0, "2020-01-01", "2999-12-31", 0,
        );
        insertar_promocion(
            &conn, producto_id, "MONTO_FIJO", 8.0, "2998-01-01", "2999-12-31", 1,
        );

        assert!(promocion_vigente(&conn, producto_id).unwrap().is_none());
    }

    #[test]
    fn test_vencida_antigua_no_desplaza_a_la_vigente() {
        let db = Database::new_en_memoria().unwrap();
        let conn = db.conn.lock().unwrap();
        let producto_id = insertar_producto(&conn, 100.0);

        insertar_promocion(
            &conn, producto_id, "PORCENTAJE", 50.0, "2019-01-01", "2019-12-31", 1,
        );
        let vigente_id = insertar_promocion(
            &conn, producto_id, "MONTO_FIJO", 12.0, "2022-03-01", "2999-12-31", 1,
        );

        let (id, tipo, valor) = promocion_vigente(&conn, producto_id).unwrap().unwrap();
        assert_eq!(id, vigente_id);
        assert_eq!(precios::precio_con_promocion(100.0, &tipo, valor), 88.0);
    }
}
