pub mod schema;

use crate::models::SesionActiva;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Mutex;

pub struct Database {
    pub conn: Mutex<Connection>,
}

pub struct SesionState {
    pub sesion: Mutex<Option<SesionActiva>>,
}

impl Database {
    pub fn new() -> Result<Self, rusqlite::Error> {
        let db_path = Self::get_db_path();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let conn = Connection::open(&db_path)?;

        // Optimizaciones SQLite para POS
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -8000;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database {
            conn: Mutex::new(conn),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Abre una base en memoria con el esquema completo (solo para pruebas)
    #[cfg(test)]
    pub fn new_en_memoria() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn get_db_path() -> PathBuf {
        let mut path = app_data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("atelier-pos.db");
        path
    }

    fn run_migrations(&self) -> Result<(), rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        schema::create_tables(&conn)?;

        // Migraciones incrementales (safe: .ok() ignora si columna ya existe)
        conn.execute("ALTER TABLE productos ADD COLUMN deposito_id INTEGER", [])
            .ok();
        conn.execute("ALTER TABLE productos ADD COLUMN imagen TEXT", [])
            .ok();
        conn.execute("ALTER TABLE cotizaciones ADD COLUMN venta_id INTEGER", [])
            .ok();
        conn.execute("ALTER TABLE tareas ADD COLUMN prioridad TEXT NOT NULL DEFAULT 'NORMAL'", [])
            .ok();

        // Seed admin por defecto si no hay usuarios
        seed_default_admin(&conn);

        Ok(())
    }
}

/// Inserta el usuario ADMINISTRADOR con PIN 0000 si no hay usuarios
fn seed_default_admin(conn: &Connection) {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM usuarios", [], |row| row.get(0))
        .unwrap_or(0);

    if count == 0 {
        let salt = crate::utils::generar_salt();
        let pin_hash = crate::utils::hash_pin(&salt, "0000");
        conn.execute(
            "INSERT INTO usuarios (nombre, pin_hash, pin_salt, rol, activo)
             VALUES ('ADMINISTRADOR', ?1, ?2, 'ADMIN', 1)",
            rusqlite::params![pin_hash, salt],
        )
        .ok();
    }
}

/// Retorna el directorio de datos de la aplicación
fn app_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("LOCALAPPDATA")
            .ok()
            .map(|p| PathBuf::from(p).join("AtelierPOS"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .ok()
            .map(|p| PathBuf::from(p).join(".atelier-pos"))
    }
}
