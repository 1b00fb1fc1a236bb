use crate::db::{Database, SesionState};
use crate::models::Tarea;
use tauri::State;

const ESTADOS: [&str; 3] = ["PENDIENTE", "EN_PROGRESO", "COMPLETADA"];
const PRIORIDADES: [&str; 3] = ["BAJA", "NORMAL", "ALTA"];

#[tauri::command]
pub fn crear_tarea(
    db: State<Database>,
    sesion: State<SesionState>,
    tarea: Tarea,
) -> Result<Tarea, String> {
    // Cualquier miembro del equipo con sesión puede crear tareas
    let guard = sesion.sesion.lock().map_err(|e| e.to_string())?;
    if guard.is_none() {
        return Err("Debe iniciar sesión".to_string());
    }
    drop(guard);

    validar_tarea(&tarea)?;

    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    conn.execute(
        "INSERT INTO tareas (titulo, descripcion, asignado_id, fecha_limite, estado, prioridad)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            tarea.titulo.trim(),
            tarea.descripcion,
            tarea.asignado_id,
            tarea.fecha_limite,
            tarea.estado,
            tarea.prioridad,
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(Tarea {
        id: Some(conn.last_insert_rowid()),
        titulo: tarea.titulo.trim().to_string(),
        ..tarea
    })
}

#[tauri::command]
pub fn actualizar_tarea(db: State<Database>, tarea: Tarea) -> Result<(), String> {
    let id = tarea.id.ok_or("ID requerido para actualizar")?;
    validar_tarea(&tarea)?;

    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let afectadas = conn
        .execute(
            "UPDATE tareas SET titulo=?1, descripcion=?2, asignado_id=?3, fecha_limite=?4,
             estado=?5, prioridad=?6, updated_at=datetime('now','localtime')
             WHERE id=?7",
            rusqlite::params![
                tarea.titulo.trim(),
                tarea.descripcion,
                tarea.asignado_id,
                tarea.fecha_limite,
                tarea.estado,
                tarea.prioridad,
                id,
            ],
        )
        .map_err(|e| e.to_string())?;

    if afectadas == 0 {
        return Err("Tarea no encontrada".to_string());
    }
    Ok(())
}

#[tauri::command]
pub fn listar_tareas(db: State<Database>, estado: Option<String>) -> Result<Vec<Tarea>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let sql_base = "SELECT t.id, t.titulo, t.descripcion, t.asignado_id, u.nombre,
                    t.fecha_limite, t.estado, t.prioridad
                    FROM tareas t
                    LEFT JOIN usuarios u ON t.asignado_id = u.id";

    let tareas = match estado {
        Some(e) => {
            let sql = format!(
                "{} WHERE t.estado = ?1 ORDER BY t.fecha_limite IS NULL, t.fecha_limite",
                sql_base
            );
            let mut stmt = conn.prepare(&sql).map_err(|e| e.to_string())?;
            let filas = stmt
                .query_map(rusqlite::params![e], mapear_tarea)
                .map_err(|e| e.to_string())?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| e.to_string())?;
            filas
        }
        None => {
            let sql = format!(
                "{} ORDER BY t.fecha_limite IS NULL, t.fecha_limite",
                sql_base
            );
            let mut stmt = conn.prepare(&sql).map_err(|e| e.to_string())?;
            let filas = stmt
                .query_map([], mapear_tarea)
                .map_err(|e| e.to_string())?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| e.to_string())?;
            filas
        }
    };

    Ok(tareas)
}

#[tauri::command]
pub fn eliminar_tarea(db: State<Database>, id: i64) -> Result<(), String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let afectadas = conn
        .execute("DELETE FROM tareas WHERE id = ?1", rusqlite::params![id])
        .map_err(|e| e.to_string())?;

    if afectadas == 0 {
        return Err("Tarea no encontrada".to_string());
    }
    Ok(())
}

fn validar_tarea(tarea: &Tarea) -> Result<(), String> {
    if tarea.titulo.trim().is_empty() {
        return Err("El título no puede estar vacío".to_string());
    }
    if !ESTADOS.contains(&tarea.estado.as_str()) {
        return Err(format!("Estado de tarea no válido: {}", tarea.estado));
    }
    if !PRIORIDADES.contains(&tarea.prioridad.as_str()) {
        return Err(format!("Prioridad no válida: {}", tarea.prioridad));
    }
    Ok(())
}

fn mapear_tarea(row: &rusqlite::Row) -> Result<Tarea, rusqlite::Error> {
    Ok(Tarea {
        id: Some(row.get(0)?),
        titulo: row.get(1)?,
        descripcion: row.get(2)?,
        asignado_id: row.get(3)?,
        asignado_nombre: row.get(4)?,
        fecha_limite: row.get(5)?,
        estado: row.get(6)?,
        prioridad: row.get(7)?,
    })
}
