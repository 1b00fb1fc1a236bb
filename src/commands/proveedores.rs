use crate::db::Database;
use crate::models::Proveedor;
use tauri::State;

#[tauri::command]
pub fn crear_proveedor(db: State<Database>, proveedor: Proveedor) -> Result<i64, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    conn.execute(
        "INSERT INTO proveedores (identificacion, nombre, contacto, direccion, telefono, email, activo)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            proveedor.identificacion,
            proveedor.nombre,
            proveedor.contacto,
            proveedor.direccion,
            proveedor.telefono,
            proveedor.email,
            proveedor.activo as i32,
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(conn.last_insert_rowid())
}

#[tauri::command]
pub fn actualizar_proveedor(db: State<Database>, proveedor: Proveedor) -> Result<(), String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    let id = proveedor.id.ok_or("ID requerido para actualizar")?;

    conn.execute(
        "UPDATE proveedores SET identificacion=?1, nombre=?2, contacto=?3, direccion=?4,
         telefono=?5, email=?6, activo=?7, updated_at=datetime('now','localtime')
         WHERE id=?8",
        rusqlite::params![
            proveedor.identificacion,
            proveedor.nombre,
            proveedor.contacto,
            proveedor.direccion,
            proveedor.telefono,
            proveedor.email,
            proveedor.activo as i32,
            id,
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

#[tauri::command]
pub fn listar_proveedores(db: State<Database>) -> Result<Vec<Proveedor>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT id, identificacion, nombre, contacto, direccion, telefono, email, activo
             FROM proveedores WHERE activo = 1 ORDER BY nombre",
        )
        .map_err(|e| e.to_string())?;

    let proveedores = stmt
        .query_map([], |row| {
            Ok(Proveedor {
                id: Some(row.get(0)?),
                identificacion: row.get(1)?,
                nombre: row.get(2)?,
                contacto: row.get(3)?,
                direccion: row.get(4)?,
                telefono: row.get(5)?,
                email: row.get(6)?,
                activo: row.get::<_, i32>(7)? != 0,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(proveedores)
}

/// Desactiva (soft-delete) un proveedor
#[tauri::command]
pub fn eliminar_proveedor(db: State<Database>, id: i64) -> Result<(), String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let afectadas = conn
        .execute(
            "UPDATE proveedores SET activo = 0, updated_at = datetime('now','localtime') WHERE id = ?1",
            rusqlite::params![id],
        )
        .map_err(|e| e.to_string())?;

    if afectadas == 0 {
        return Err("Proveedor no encontrado".to_string());
    }
    Ok(())
}
