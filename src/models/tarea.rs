use serde::{Deserialize, Serialize};

/// Tarea del equipo. Estados: PENDIENTE, EN_PROGRESO, COMPLETADA.
/// Prioridades: BAJA, NORMAL, ALTA.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Tarea {
    pub id: Option<i64>,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub asignado_id: Option<i64>,
    pub asignado_nombre: Option<String>,
    pub fecha_limite: Option<String>,
    pub estado: String,
    pub prioridad: String,
}
