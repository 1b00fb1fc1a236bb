use crate::db::{Database, SesionState};
use crate::models::{NuevaVenta, Venta, VentaCompleta, VentaDetalle};
use rusqlite::Connection;
use tauri::State;

#[tauri::command]
pub fn registrar_venta(
    db: State<Database>,
    sesion: State<SesionState>,
    venta: NuevaVenta,
) -> Result<VentaCompleta, String> {
    // Verificar sesión activa
    let sesion_guard = sesion.sesion.lock().map_err(|e| e.to_string())?;
    let sesion_actual = sesion_guard
        .as_ref()
        .ok_or("Debe iniciar sesión para registrar ventas".to_string())?;
    let usuario_nombre = sesion_actual.nombre.clone();
    let usuario_id = sesion_actual.usuario_id;
    drop(sesion_guard);

    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    registrar_venta_core(&conn, &usuario_nombre, usuario_id, venta)
}

/// Núcleo del registro de venta sobre una conexión ya tomada. La conversión
/// de cotizaciones lo invoca dentro de su propio lock para que chequeo de
/// estado, venta y marca queden bajo el mismo guard.
pub(crate) fn registrar_venta_core(
    conn: &Connection,
    usuario_nombre: &str,
    usuario_id: i64,
    venta: NuevaVenta,
) -> Result<VentaCompleta, String> {
    if venta.items.is_empty() {
        return Err("La venta debe tener al menos un producto".to_string());
    }

    // Verificar que haya caja abierta
    let caja_abierta: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM caja WHERE estado = 'ABIERTA'",
            [],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count > 0)
        .unwrap_or(false);

    if !caja_abierta {
        return Err("Debe abrir la caja antes de realizar ventas".to_string());
    }

    // Obtener secuencial interno
    let secuencial: i64 = conn
        .query_row(
            "SELECT CAST(value AS INTEGER) FROM config WHERE key = 'secuencial_venta'",
            [],
            |row| row.get(0),
        )
        .map_err(|e| e.to_string())?;

    let numero = format!("VT-{:09}", secuencial);

    // Calcular totales
    let mut subtotal = 0.0_f64;
    for item in &venta.items {
        subtotal += item.cantidad * item.precio_unitario - item.descuento;
    }

    let total = subtotal - venta.descuento;

    // Al cerrar caja el efectivo esperado se calcula con el total de cada
    // venta; un pago en efectivo incompleto dejaría un faltante fantasma.
    if venta.forma_pago == "EFECTIVO" && venta.monto_recibido < total {
        return Err(format!(
            "El monto recibido ({:.2}) no cubre el total de la venta ({:.2})",
            venta.monto_recibido, total
        ));
    }

    let cambio = if venta.monto_recibido > total {
        venta.monto_recibido - total
    } else {
        0.0
    };

    // Insertar cabecera de venta
    conn.execute(
        "INSERT INTO ventas (numero, cliente_id, subtotal, descuento, total, forma_pago,
         monto_recibido, cambio, estado, observacion, usuario, usuario_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        rusqlite::params![
            numero,
            venta.cliente_id.unwrap_or(1),
            subtotal,
            venta.descuento,
            total,
            venta.forma_pago,
            venta.monto_recibido,
            cambio,
            "COMPLETADA",
            venta.observacion,
            usuario_nombre,
            usuario_id,
        ],
    )
    .map_err(|e| e.to_string())?;

    let venta_id = conn.last_insert_rowid();

    // Insertar detalles y descontar stock
    let mut detalles_guardados = Vec::new();
    for item in &venta.items {
        let subtotal_item = item.cantidad * item.precio_unitario - item.descuento;

        conn.execute(
            "INSERT INTO venta_detalles (venta_id, producto_id, cantidad, precio_unitario,
             descuento, subtotal)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                venta_id,
                item.producto_id,
                item.cantidad,
                item.precio_unitario,
                item.descuento,
                subtotal_item,
            ],
        )
        .map_err(|e| e.to_string())?;
        let detalle_id = conn.last_insert_rowid();

        conn.execute(
            "UPDATE productos SET stock_actual = stock_actual - ?1,
             updated_at = datetime('now','localtime')
             WHERE id = ?2",
            rusqlite::params![item.cantidad, item.producto_id],
        )
        .map_err(|e| e.to_string())?;

        let nombre_prod: String = conn
            .query_row(
                "SELECT nombre FROM productos WHERE id = ?1",
                rusqlite::params![item.producto_id],
                |row| row.get(0),
            )
            .unwrap_or_default();

        detalles_guardados.push(VentaDetalle {
            id: Some(detalle_id),
            venta_id: Some(venta_id),
            producto_id: item.producto_id,
            nombre_producto: Some(nombre_prod),
            cantidad: item.cantidad,
            precio_unitario: item.precio_unitario,
            descuento: item.descuento,
            subtotal: subtotal_item,
        });
    }

    // Actualizar secuencial interno
    conn.execute(
        "UPDATE config SET value = CAST(?1 AS TEXT) WHERE key = 'secuencial_venta'",
        rusqlite::params![secuencial + 1],
    )
    .map_err(|e| e.to_string())?;

    // Actualizar monto de la caja abierta
    conn.execute(
        "UPDATE caja SET monto_ventas = monto_ventas + ?1,
         monto_esperado = monto_inicial + monto_ventas + ?1
         WHERE estado = 'ABIERTA'",
        rusqlite::params![total],
    )
    .ok();

    let cliente_nombre: Option<String> = conn
        .query_row(
            "SELECT nombre FROM clientes WHERE id = ?1",
            rusqlite::params![venta.cliente_id.unwrap_or(1)],
            |row| row.get(0),
        )
        .ok();

    Ok(VentaCompleta {
        venta: Venta {
            id: Some(venta_id),
            numero,
            cliente_id: venta.cliente_id,
            fecha: None,
            subtotal,
            descuento: venta.descuento,
            total,
            forma_pago: venta.forma_pago,
            monto_recibido: venta.monto_recibido,
            cambio,
            estado: "COMPLETADA".to_string(),
            usuario: Some(usuario_nombre.to_string()),
            observacion: venta.observacion,
        },
        detalles: detalles_guardados,
        cliente_nombre,
    })
}

#[tauri::command]
pub fn listar_ventas_dia(db: State<Database>, fecha: String) -> Result<Vec<Venta>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT id, numero, cliente_id, fecha, subtotal, descuento, total, forma_pago,
             monto_recibido, cambio, estado, usuario, observacion
             FROM ventas
             WHERE date(fecha) = date(?1) AND anulada = 0
             ORDER BY fecha DESC",
        )
        .map_err(|e| e.to_string())?;

    let ventas = stmt
        .query_map(rusqlite::params![fecha], mapear_venta)
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(ventas)
}

#[tauri::command]
pub fn obtener_venta(db: State<Database>, id: i64) -> Result<VentaCompleta, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let venta = conn
        .query_row(
            "SELECT id, numero, cliente_id, fecha, subtotal, descuento, total, forma_pago,
             monto_recibido, cambio, estado, usuario, observacion
             FROM ventas WHERE id = ?1",
            rusqlite::params![id],
            mapear_venta,
        )
        .map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT d.id, d.venta_id, d.producto_id, p.nombre, d.cantidad,
             d.precio_unitario, d.descuento, d.subtotal
             FROM venta_detalles d
             JOIN productos p ON d.producto_id = p.id
             WHERE d.venta_id = ?1",
        )
        .map_err(|e| e.to_string())?;

    let detalles = stmt
        .query_map(rusqlite::params![id], |row| {
            Ok(VentaDetalle {
                id: Some(row.get(0)?),
                venta_id: Some(row.get(1)?),
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

    let cliente_nombre: Option<String> = venta.cliente_id.and_then(|cid| {
        conn.query_row(
            "SELECT nombre FROM clientes WHERE id = ?1",
            rusqlite::params![cid],
            |row| row.get(0),
        )
        .ok()
    });

    Ok(VentaCompleta {
        venta,
        detalles,
        cliente_nombre,
    })
}

/// Anula una venta devolviendo el stock de sus productos. Requiere ADMIN.
#[tauri::command]
pub fn anular_venta(
    db: State<Database>,
    sesion: State<SesionState>,
    id: i64,
    motivo: Option<String>,
) -> Result<(), String> {
    crate::commands::usuarios::verificar_admin(&sesion)?;

    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let ya_anulada: i64 = conn
        .query_row(
            "SELECT anulada FROM ventas WHERE id = ?1",
            rusqlite::params![id],
            |row| row.get(0),
        )
        .map_err(|_| "Venta no encontrada".to_string())?;

    if ya_anulada != 0 {
        return Err("La venta ya está anulada".to_string());
    }

    // Devolver stock de cada detalle
    conn.execute(
        "UPDATE productos SET stock_actual = stock_actual + (
             SELECT COALESCE(SUM(d.cantidad), 0) FROM venta_detalles d
             WHERE d.venta_id = ?1 AND d.producto_id = productos.id
         ),
         updated_at = datetime('now','localtime')
         WHERE id IN (SELECT producto_id FROM venta_detalles WHERE venta_id = ?1)",
        rusqlite::params![id],
    )
    .map_err(|e| e.to_string())?;

    conn.execute(
        "UPDATE ventas SET anulada = 1, estado = 'ANULADA',
         observacion = COALESCE(?2, observacion)
         WHERE id = ?1",
        rusqlite::params![id, motivo],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

fn mapear_venta(row: &rusqlite::Row) -> Result<Venta, rusqlite::Error> {
    Ok(Venta {
        id: Some(row.get(0)?),
        numero: row.get(1)?,
        cliente_id: row.get(2)?,
        fecha: row.get(3)?,
        subtotal: row.get(4)?,
        descuento: row.get(5)?,
        total: row.get(6)?,
        forma_pago: row.get(7)?,
        monto_recibido: row.get(8)?,
        cambio: row.get(9)?,
        estado: row.get(10)?,
        usuario: row.get(11)?,
        observacion: row.get(12)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn abrir_caja_prueba(conn: &Connection) {
        conn.execute(
            "INSERT INTO caja (monto_inicial, monto_esperado, estado, usuario)
             VALUES (100, 100, 'ABIERTA', 'PRUEBA')",
            [],
        )
        .unwrap();
    }

    fn insertar_producto(conn: &Connection, codigo: &str, precio_venta: f64, stock: f64) -> i64 {
        conn.execute(
            "INSERT INTO productos (codigo, nombre, precio_venta, stock_actual, activo)
             VALUES (?1, ?2, ?3, ?4, 1)",
            rusqlite::params![codigo, format!("PRODUCTO {}", codigo), precio_venta, stock],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    fn item(producto_id: i64, cantidad: f64, precio_unitario: f64) -> VentaDetalle {
        VentaDetalle {
            id: None,
            venta_id: None,
            producto_id,
            nombre_producto: None,
            cantidad,
            precio_unitario,
            descuento: 0.0,
            subtotal: cantidad * precio_unitario,
        }
    }

    fn venta_efectivo(producto_id: i64, precio: f64, monto_recibido: f64) -> NuevaVenta {
        NuevaVenta {
            cliente_id: None,
            items: vec![item(producto_id, 1.0, precio)],
            forma_pago: "EFECTIVO".to_string(),
            monto_recibido,
            descuento: 0.0,
            observacion: None,
        }
    }

    #[test]
    fn test_efectivo_insuficiente_se_rechaza() {
        let db = Database::new_en_memoria().unwrap();
        let conn = db.conn.lock().unwrap();
        abrir_caja_prueba(&conn);
        let pid = insertar_producto(&conn, "AN-001", 50.0, 5.0);

        // recibido 40 sobre total 50: la venta no se registra
        let err = registrar_venta_core(&conn, "PRUEBA", 1, venta_efectivo(pid, 50.0, 40.0))
            .unwrap_err();
        assert!(err.contains("no cubre el total"));

        let num_ventas: i64 = conn
            .query_row("SELECT COUNT(*) FROM ventas", [], |row| row.get(0))
            .unwrap();
        assert_eq!(num_ventas, 0);

        let stock: f64 = conn
            .query_row(
                "SELECT stock_actual FROM productos WHERE id = ?1",
                rusqlite::params![pid],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stock, 5.0);
    }

    #[test]
    fn test_efectivo_suficiente_calcula_cambio() {
        let db = Database::new_en_memoria().unwrap();
        let conn = db.conn.lock().unwrap();
        abrir_caja_prueba(&conn);
        let pid = insertar_producto(&conn, "AN-002", 50.0, 5.0);

        let completa =
            registrar_venta_core(&conn, "PRUEBA", 1, venta_efectivo(pid, 50.0, 60.0)).unwrap();

        assert_eq!(completa.venta.numero, "VT-000000001");
        assert_eq!(completa.venta.total, 50.0);
        assert_eq!(completa.venta.cambio, 10.0);

        let stock: f64 = conn
            .query_row(
                "SELECT stock_actual FROM productos WHERE id = ?1",
                rusqlite::params![pid],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stock, 4.0);
    }

    #[test]
    fn test_transferencia_no_exige_monto_recibido() {
        let db = Database::new_en_memoria().unwrap();
        let conn = db.conn.lock().unwrap();
        abrir_caja_prueba(&conn);
        let pid = insertar_producto(&conn, "AN-003", 80.0, 2.0);

        let nueva = NuevaVenta {
            cliente_id: None,
            items: vec![item(pid, 1.0, 80.0)],
            forma_pago: "TRANSFER".to_string(),
            monto_recibido: 0.0,
            descuento: 0.0,
            observacion: None,
        };

        let completa = registrar_venta_core(&conn, "PRUEBA", 1, nueva).unwrap();
        assert_eq!(completa.venta.cambio, 0.0);
    }
}
