use crate::db::Database;
use crate::models::Cliente;
use tauri::State;

#[tauri::command]
pub fn crear_cliente(db: State<Database>, cliente: Cliente) -> Result<i64, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    conn.execute(
        "INSERT INTO clientes (identificacion, nombre, direccion, telefono, email, observacion, activo)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            cliente.identificacion,
            cliente.nombre,
            cliente.direccion,
            cliente.telefono,
            cliente.email,
            cliente.observacion,
            cliente.activo as i32,
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(conn.last_insert_rowid())
}

#[tauri::command]
pub fn actualizar_cliente(db: State<Database>, cliente: Cliente) -> Result<(), String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    let id = cliente.id.ok_or("ID requerido para actualizar")?;

    conn.execute(
        "UPDATE clientes SET identificacion=?1, nombre=?2, direccion=?3, telefono=?4,
         email=?5, observacion=?6, activo=?7, updated_at=datetime('now','localtime')
         WHERE id=?8",
        rusqlite::params![
            cliente.identificacion,
            cliente.nombre,
            cliente.direccion,
            cliente.telefono,
            cliente.email,
            cliente.observacion,
            cliente.activo as i32,
            id,
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

#[tauri::command]
pub fn buscar_clientes(db: State<Database>, termino: String) -> Result<Vec<Cliente>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    let busqueda = format!("%{}%", termino);

    let mut stmt = conn
        .prepare(
            "SELECT id, identificacion, nombre, direccion, telefono, email, observacion, activo
             FROM clientes
             WHERE activo = 1 AND (nombre LIKE ?1 OR identificacion LIKE ?1 OR telefono LIKE ?1)
             ORDER BY nombre LIMIT 30",
        )
        .map_err(|e| e.to_string())?;

    let clientes = stmt
        .query_map(rusqlite::params![busqueda], mapear_cliente)
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(clientes)
}

#[tauri::command]
pub fn listar_clientes(db: State<Database>) -> Result<Vec<Cliente>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT id, identificacion, nombre, direccion, telefono, email, observacion, activo
             FROM clientes WHERE activo = 1 ORDER BY nombre",
        )
        .map_err(|e| e.to_string())?;

    let clientes = stmt
        .query_map([], mapear_cliente)
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(clientes)
}

/// Desactiva (soft-delete) un cliente. El consumidor final no se toca.
#[tauri::command]
pub fn eliminar_cliente(db: State<Database>, id: i64) -> Result<(), String> {
    if id == 1 {
        return Err("No se puede eliminar el consumidor final".to_string());
    }

    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let afectadas = conn
        .execute(
            "UPDATE clientes SET activo = 0, updated_at = datetime('now','localtime') WHERE id = ?1",
            rusqlite::params![id],
        )
        .map_err(|e| e.to_string())?;

    if afectadas == 0 {
        return Err("Cliente no encontrado".to_string());
    }
    Ok(())
}

fn mapear_cliente(row: &rusqlite::Row) -> Result<Cliente, rusqlite::Error> {
    Ok(Cliente {
        id: Some(row.get(0)?),
        identificacion: row.get(1)?,
        nombre: row.get(2)?,
        direccion: row.get(3)?,
        telefono: row.get(4)?,
        email: row.get(5)?,
        observacion: row.get(6)?,
        activo: row.get::<_, i32>(7)? != 0,
    })
}
