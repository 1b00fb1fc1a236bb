use crate::db::{Database, SesionState};
use crate::models::{
    Cotizacion, CotizacionCompleta, CotizacionDetalle, NuevaCotizacion, NuevaVenta, VentaCompleta,
    VentaDetalle,
};
use rusqlite::Connection;
use tauri::State;

#[tauri::command]
pub fn crear_cotizacion(
    db: State<Database>,
    sesion: State<SesionState>,
    cotizacion: NuevaCotizacion,
) -> Result<CotizacionCompleta, String> {
    let sesion_guard = sesion.sesion.lock().map_err(|e| e.to_string())?;
    let sesion_actual = sesion_guard
        .as_ref()
        .ok_or("Debe iniciar sesión".to_string())?;
    let usuario_nombre = sesion_actual.nombre.clone();
    drop(sesion_guard);

    if cotizacion.items.is_empty() {
        return Err("La cotización debe tener al menos un producto".to_string());
    }

    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let secuencial: i64 = conn
        .query_row(
            "SELECT CAST(value AS INTEGER) FROM config WHERE key = 'secuencial_cotizacion'",
            [],
            |row| row.get(0),
        )
        .map_err(|e| e.to_string())?;

    let numero = format!("CT-{:09}", secuencial);

    let mut subtotal = 0.0_f64;
    for item in &cotizacion.items {
        subtotal += item.cantidad * item.precio_unitario - item.descuento;
    }
    let total = subtotal - cotizacion.descuento;

    conn.execute(
        "INSERT INTO cotizaciones (numero, cliente_id, valida_hasta, subtotal, descuento,
         total, estado, usuario, observacion)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'PENDIENTE', ?7, ?8)",
        rusqlite::params![
            numero,
            cotizacion.cliente_id.unwrap_or(1),
            cotizacion.valida_hasta,
            subtotal,
            cotizacion.descuento,
            total,
            usuario_nombre,
            cotizacion.observacion,
        ],
    )
    .map_err(|e| e.to_string())?;

    let cotizacion_id = conn.last_insert_rowid();

    let mut detalles_guardados = Vec::new();
    for item in &cotizacion.items {
        let subtotal_item = item.cantidad * item.precio_unitario - item.descuento;

        conn.execute(
            "INSERT INTO cotizacion_detalles (cotizacion_id, producto_id, cantidad,
             precio_unitario, descuento, subtotal)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                cotizacion_id,
                item.producto_id,
                item.cantidad,
                item.precio_unitario,
                item.descuento,
                subtotal_item,
            ],
        )
        .map_err(|e| e.to_string())?;

        detalles_guardados.push(CotizacionDetalle {
            id: Some(conn.last_insert_rowid()),
            cotizacion_id: Some(cotizacion_id),
            producto_id: item.producto_id,
            nombre_producto: item.nombre_producto.clone(),
            cantidad: item.cantidad,
            precio_unitario: item.precio_unitario,
            descuento: item.descuento,
            subtotal: subtotal_item,
        });
    }

    conn.execute(
        "UPDATE config SET value = CAST(?1 AS TEXT) WHERE key = 'secuencial_cotizacion'",
        rusqlite::params![secuencial + 1],
    )
    .map_err(|e| e.to_string())?;

    let cliente_nombre: Option<String> = conn
        .query_row(
            "SELECT nombre FROM clientes WHERE id = ?1",
            rusqlite::params![cotizacion.cliente_id.unwrap_or(1)],
            |row| row.get(0),
        )
        .ok();

    Ok(CotizacionCompleta {
        cotizacion: Cotizacion {
            id: Some(cotizacion_id),
            numero,
            cliente_id: cotizacion.cliente_id,
            fecha: None,
            valida_hasta: cotizacion.valida_hasta,
            subtotal,
            descuento: cotizacion.descuento,
            total,
            estado: "PENDIENTE".to_string(),
            venta_id: None,
            usuario: Some(usuario_nombre),
            observacion: cotizacion.observacion,
        },
        detalles: detalles_guardados,
        cliente_nombre,
    })
}

#[tauri::command]
pub fn listar_cotizaciones(
    db: State<Database>,
    estado: Option<String>,
) -> Result<Vec<Cotizacion>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let cotizaciones = match estado {
        Some(ref e) => {
            let mut stmt = conn
                .prepare(
                    "SELECT id, numero, cliente_id, fecha, valida_hasta, subtotal, descuento,
                     total, estado, venta_id, usuario, observacion
                     FROM cotizaciones WHERE estado = ?1 ORDER BY fecha DESC",
                )
                .map_err(|e| e.to_string())?;
            let filas = stmt
                .query_map(rusqlite::params![e], mapear_cotizacion)
                .map_err(|e| e.to_string())?
                .collect::<Result<Vec<_>, _>>();
            filas
        }
        None => {
            let mut stmt = conn
                .prepare(
                    "SELECT id, numero, cliente_id, fecha, valida_hasta, subtotal, descuento,
                     total, estado, venta_id, usuario, observacion
                     FROM cotizaciones ORDER BY fecha DESC",
                )
                .map_err(|e| e.to_string())?;
            let filas = stmt
                .query_map([], mapear_cotizacion)
                .map_err(|e| e.to_string())?
                .collect::<Result<Vec<_>, _>>();
            filas
        }
    }
    .map_err(|e| e.to_string())?;

    Ok(cotizaciones)
}

#[tauri::command]
pub fn obtener_cotizacion(db: State<Database>, id: i64) -> Result<CotizacionCompleta, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let cotizacion = conn
        .query_row(
            "SELECT id, numero, cliente_id, fecha, valida_hasta, subtotal, descuento, total,
             estado, venta_id, usuario, observacion
             FROM cotizaciones WHERE id = ?1",
            rusqlite::params![id],
            mapear_cotizacion,
        )
        .map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT d.id, d.cotizacion_id, d.producto_id, p.nombre, d.cantidad,
             d.precio_unitario, d.descuento, d.subtotal
             FROM cotizacion_detalles d
             JOIN productos p ON d.producto_id = p.id
             WHERE d.cotizacion_id = ?1",
        )
        .map_err(|e| e.to_string())?;

    let detalles = stmt
        .query_map(rusqlite::params![id], |row| {
            Ok(CotizacionDetalle {
                id: Some(row.get(0)?),
                cotizacion_id: Some(row.get(1)?),
                producto_id: row.get(2)?,
                nombre_producto: Some(row.get(3)?),
                cantidad: row.get(4)?,
                precio_unitario: row.get(5)?,
                descuento: row.get(6)?,
                subtotal: row.get(7)?,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let cliente_nombre: Option<String> = cotizacion.cliente_id.and_then(|cid| {
        conn.query_row(
            "SELECT nombre FROM clientes WHERE id = ?1",
            rusqlite::params![cid],
            |row| row.get(0),
        )
        .ok()
    });

    Ok(CotizacionCompleta {
        cotizacion,
        detalles,
        cliente_nombre,
    })
}

/// Cambia el estado de una cotización (PENDIENTE, ACEPTADA, RECHAZADA).
/// Las convertidas no se tocan a mano.
#[tauri::command]
pub fn cambiar_estado_cotizacion(
    db: State<Database>,
    id: i64,
    estado: String,
) -> Result<(), String> {
    if estado != "PENDIENTE" && estado != "ACEPTADA" && estado != "RECHAZADA" {
        return Err(format!("Estado de cotización no válido: {}", estado));
    }

    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let actual: String = conn
        .query_row(
            "SELECT estado FROM cotizaciones WHERE id = ?1",
            rusqlite::params![id],
            |row| row.get(0),
        )
        .map_err(|_| "Cotización no encontrada".to_string())?;

    if actual == "CONVERTIDA" {
        return Err("La cotización ya fue convertida en venta".to_string());
    }

    conn.execute(
        "UPDATE cotizaciones SET estado = ?1 WHERE id = ?2",
        rusqlite::params![estado, id],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

/// Convierte una cotización en venta reusando el flujo normal de ventas
/// (caja abierta, stock, secuencial) y la marca CONVERTIDA.
#[tauri::command]
pub fn convertir_cotizacion_en_venta(
    db: State<Database>,
    sesion: State<SesionState>,
    id: i64,
    forma_pago: String,
    monto_recibido: f64,
) -> Result<VentaCompleta, String> {
    let sesion_guard = sesion.sesion.lock().map_err(|e| e.to_string())?;
    let sesion_actual = sesion_guard
        .as_ref()
        .ok_or("Debe iniciar sesión para registrar ventas".to_string())?;
    let usuario_nombre = sesion_actual.nombre.clone();
    let usuario_id = sesion_actual.usuario_id;
    drop(sesion_guard);

    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    convertir_cotizacion_core(&conn, &usuario_nombre, usuario_id, id, forma_pago, monto_recibido)
}

/// Lectura del estado, registro de la venta y marca CONVERTIDA bajo un mismo
/// guard de conexión: dos conversiones simultáneas de la misma cotización no
/// pueden colarse entre el chequeo y la marca.
pub(crate) fn convertir_cotizacion_core(
    conn: &Connection,
    usuario_nombre: &str,
    usuario_id: i64,
    id: i64,
    forma_pago: String,
    monto_recibido: f64,
) -> Result<VentaCompleta, String> {
    let (cliente_id, descuento, estado, observacion): (Option<i64>, f64, String, Option<String>) =
        conn.query_row(
            "SELECT cliente_id, descuento, estado, observacion FROM cotizaciones WHERE id = ?1",
            rusqlite::params![id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .map_err(|_| "Cotización no encontrada".to_string())?;

    if estado == "CONVERTIDA" {
        return Err("La cotización ya fue convertida en venta".to_string());
    }
    if estado == "RECHAZADA" {
        return Err("No se puede convertir una cotización rechazada".to_string());
    }

    let mut stmt = conn
        .prepare(
            "SELECT producto_id, cantidad, precio_unitario, descuento
             FROM cotizacion_detalles WHERE cotizacion_id = ?1",
        )
        .map_err(|e| e.to_string())?;

    let items: Vec<VentaDetalle> = stmt
        .query_map(rusqlite::params![id], |row| {
            let cantidad: f64 = row.get(1)?;
            let precio_unitario: f64 = row.get(2)?;
            let descuento: f64 = row.get(3)?;
            Ok(VentaDetalle {
                id: None,
                venta_id: None,
                producto_id: row.get(0)?,
                nombre_producto: None,
                cantidad,
                precio_unitario,
                descuento,
                subtotal: cantidad * precio_unitario - descuento,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    drop(stmt);

    let venta = crate::commands::ventas::registrar_venta_core(
        conn,
        usuario_nombre,
        usuario_id,
        NuevaVenta {
            cliente_id,
            items,
            forma_pago,
            monto_recibido,
            descuento,
            observacion,
        },
    )?;

    conn.execute(
        "UPDATE cotizaciones SET estado = 'CONVERTIDA', venta_id = ?1 WHERE id = ?2",
        rusqlite::params![venta.venta.id, id],
    )
    .map_err(|e| e.to_string())?;

    Ok(venta)
}

fn mapear_cotizacion(row: &rusqlite::Row) -> Result<Cotizacion, rusqlite::Error> {
    Ok(Cotizacion {
        id: Some(row.get(0)?),
        numero: row.get(1)?,
        cliente_id: row.get(2)?,
        fecha: row.get(3)?,
        valida_hasta: row.get(4)?,
        subtotal: row.get(5)?,
        descuento: row.get(6)?,
        total: row.get(7)?,
        estado: row.get(8)?,
        venta_id: row.get(9)?,
        usuario: row.get(10)?,
        observacion: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn preparar_entorno(conn: &Connection) -> i64 {
        conn.execute(
            "INSERT INTO caja (monto_inicial, monto_esperado, estado, usuario)
             VALUES (100, 100, 'ABIERTA', 'PRUEBA')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO productos (codigo, nombre, precio_venta, stock_actual, activo)
             VALUES ('AN-010', 'ANILLO PRUEBA', 50.0, 5.0, 1)",
            [],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    fn insertar_cotizacion(conn: &Connection, producto_id: i64, estado: &str) -> i64 {
        conn.execute(
            "INSERT INTO cotizaciones (numero, cliente_id, subtotal, descuento, total,
             estado, usuario)
             VALUES ('CT-000000001', 1, 50.0, 0, 50.0, ?1, 'PRUEBA')",
            rusqlite::params![estado],
        )
        .unwrap();
        let cotizacion_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO cotizacion_detalles (cotizacion_id, producto_id, cantidad,
             precio_unitario, descuento, subtotal)
             VALUES (?1, ?2, 1.0, 50.0, 0, 50.0)",
            rusqlite::params![cotizacion_id, producto_id],
        )
        .unwrap();
        cotizacion_id
    }

    #[test]
    fn test_convertir_dos_veces_solo_genera_una_venta() {
        let db = Database::new_en_memoria().unwrap();
        let conn = db.conn.lock().unwrap();
        let producto_id = preparar_entorno(&conn);
        let cotizacion_id = insertar_cotizacion(&conn, producto_id, "PENDIENTE");

        let venta =
            convertir_cotizacion_core(&conn, "PRUEBA", 1, cotizacion_id, "EFECTIVO".into(), 50.0)
                .unwrap();

        let (estado, venta_id): (String, Option<i64>) = conn
            .query_row(
                "SELECT estado, venta_id FROM cotizaciones WHERE id = ?1",
                rusqlite::params![cotizacion_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(estado, "CONVERTIDA");
        assert_eq!(venta_id, venta.venta.id);

        // El segundo intento encuentra la marca y no registra nada
        let err =
            convertir_cotizacion_core(&conn, "PRUEBA", 1, cotizacion_id, "EFECTIVO".into(), 50.0)
                .unwrap_err();
        assert!(err.contains("ya fue convertida"));

        let num_ventas: i64 = conn
            .query_row("SELECT COUNT(*) FROM ventas", [], |row| row.get(0))
            .unwrap();
        assert_eq!(num_ventas, 1);

        let stock: f64 = conn
            .query_row(
                "SELECT stock_actual FROM productos WHERE id = ?1",
                rusqlite::params![producto_id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stock, 4.0);
    }

    #[test]
    fn test_no_se_convierte_cotizacion_rechazada() {
        let db = Database::new_en_memoria().unwrap();
        let conn = db.conn.lock().unwrap();
        let producto_id = preparar_entorno(&conn);
        let cotizacion_id = insertar_cotizacion(&conn, producto_id, "RECHAZADA");

        let err =
            convertir_cotizacion_core(&conn, "PRUEBA", 1, cotizacion_id, "EFECTIVO".into(), 50.0)
                .unwrap_err();
        assert!(err.contains("rechazada"));

        let num_ventas: i64 = conn
            .query_row("SELECT COUNT(*) FROM ventas", [], |row| row.get(0))
            .unwrap();
        assert_eq!(num_ventas, 0);
    }
}
