use crate::db::Database;
use serde::{Deserialize, Serialize};
use tauri::State;

#[derive(Debug, Serialize, Deserialize)]
pub struct ResumenDiario {
    pub total_ventas: f64,
    pub num_ventas: i64,
    pub total_efectivo: f64,
    pub total_transferencia: f64,
    pub total_tarjeta: f64,
    pub utilidad_bruta: f64,
    pub total_descuentos: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductoMasVendido {
    pub producto_id: i64,
    pub nombre: String,
    pub cantidad_total: f64,
    pub total_vendido: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AlertaStock {
    pub id: i64,
    pub codigo: Option<String>,
    pub nombre: String,
    pub stock_actual: f64,
    pub stock_minimo: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VentaDia {
    pub fecha: String,
    pub num_ventas: i64,
    pub total: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValorInventario {
    pub num_productos: i64,
    pub unidades_totales: f64,
    pub valor_costo: f64,
    pub valor_venta: f64,
}

#[tauri::command]
pub fn resumen_diario(db: State<Database>, fecha: String) -> Result<ResumenDiario, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let total_ventas: f64 = conn
        .query_row(
            "SELECT COALESCE(SUM(total), 0) FROM ventas WHERE date(fecha) = date(?1) AND anulada = 0",
            rusqlite::params![fecha],
            |row| row.get(0),
        )
        .unwrap_or(0.0);

    let num_ventas: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM ventas WHERE date(fecha) = date(?1) AND anulada = 0",
            rusqlite::params![fecha],
            |row| row.get(0),
        )
        .unwrap_or(0);

    let total_efectivo: f64 = conn
        .query_row(
            "SELECT COALESCE(SUM(total), 0) FROM ventas WHERE date(fecha) = date(?1) AND forma_pago = 'EFECTIVO' AND anulada = 0",
            rusqlite::params![fecha],
            |row| row.get(0),
        )
        .unwrap_or(0.0);

    let total_transferencia: f64 = conn
        .query_row(
            "SELECT COALESCE(SUM(total), 0) FROM ventas WHERE date(fecha) = date(?1) AND forma_pago = 'TRANSFER' AND anulada = 0",
            rusqlite::params![fecha],
            |row| row.get(0),
        )
        .unwrap_or(0.0);

    let total_tarjeta: f64 = conn
        .query_row(
            "SELECT COALESCE(SUM(total), 0) FROM ventas WHERE date(fecha) = date(?1) AND forma_pago = 'TARJETA' AND anulada = 0",
            rusqlite::params![fecha],
            |row| row.get(0),
        )
        .unwrap_or(0.0);

    // Utilidad bruta = sum(subtotal_venta) - sum(precio_costo * cantidad)
    let utilidad_bruta: f64 = conn
        .query_row(
            "SELECT COALESCE(SUM(vd.subtotal - (p.precio_costo * vd.cantidad)), 0)
             FROM venta_detalles vd
             JOIN ventas v ON vd.venta_id = v.id
             JOIN productos p ON vd.producto_id = p.id
             WHERE date(v.fecha) = date(?1) AND v.anulada = 0",
            rusqlite::params![fecha],
            |row| row.get(0),
        )
        .unwrap_or(0.0);

    let total_descuentos: f64 = conn
        .query_row(
            "SELECT COALESCE(SUM(descuento), 0) FROM ventas WHERE date(fecha) = date(?1) AND anulada = 0",
            rusqlite::params![fecha],
            |row| row.get(0),
        )
        .unwrap_or(0.0);

    Ok(ResumenDiario {
        total_ventas,
        num_ventas,
        total_efectivo,
        total_transferencia,
        total_tarjeta,
        utilidad_bruta,
        total_descuentos,
    })
}

#[tauri::command]
pub fn productos_mas_vendidos(
    db: State<Database>,
    fecha_inicio: String,
    fecha_fin: String,
    limite: i64,
) -> Result<Vec<ProductoMasVendido>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT p.id, p.nombre, SUM(vd.cantidad) as cant, SUM(vd.subtotal) as tot
             FROM venta_detalles vd
             JOIN ventas v ON vd.venta_id = v.id
             JOIN productos p ON vd.producto_id = p.id
             WHERE date(v.fecha) BETWEEN date(?1) AND date(?2) AND v.anulada = 0
             GROUP BY p.id
             ORDER BY cant DESC
             LIMIT ?3",
        )
        .map_err(|e| e.to_string())?;

    let productos = stmt
        .query_map(rusqlite::params![fecha_inicio, fecha_fin, limite], |row| {
            Ok(ProductoMasVendido {
                producto_id: row.get(0)?,
                nombre: row.get(1)?,
                cantidad_total: row.get(2)?,
                total_vendido: row.get(3)?,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(productos)
}

#[tauri::command]
pub fn alertas_stock_bajo(db: State<Database>) -> Result<Vec<AlertaStock>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT id, codigo, nombre, stock_actual, stock_minimo
             FROM productos
             WHERE activo = 1 AND stock_actual <= stock_minimo
             ORDER BY (stock_actual - stock_minimo) ASC",
        )
        .map_err(|e| e.to_string())?;

    let alertas = stmt
        .query_map([], |row| {
            Ok(AlertaStock {
                id: row.get(0)?,
                codigo: row.get(1)?,
                nombre: row.get(2)?,
                stock_actual: row.get(3)?,
                stock_minimo: row.get(4)?,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(alertas)
}

/// Serie diaria de ventas para el rango dado (días sin ventas no aparecen)
#[tauri::command]
pub fn ventas_por_dia(
    db: State<Database>,
    fecha_inicio: String,
    fecha_fin: String,
) -> Result<Vec<VentaDia>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare(
            "SELECT date(fecha) as dia, COUNT(*), COALESCE(SUM(total), 0)
             FROM ventas
             WHERE date(fecha) BETWEEN date(?1) AND date(?2) AND anulada = 0
             GROUP BY dia
             ORDER BY dia",
        )
        .map_err(|e| e.to_string())?;

    let dias = stmt
        .query_map(rusqlite::params![fecha_inicio, fecha_fin], |row| {
            Ok(VentaDia {
                fecha: row.get(0)?,
                num_ventas: row.get(1)?,
                total: row.get(2)?,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(dias)
}

/// Valoración del inventario activo a costo y a precio de venta
#[tauri::command]
pub fn valor_inventario(db: State<Database>) -> Result<ValorInventario, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let resumen = conn
        .query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(stock_actual), 0),
                    COALESCE(SUM(stock_actual * precio_costo), 0),
                    COALESCE(SUM(stock_actual * precio_venta), 0)
             FROM productos WHERE activo = 1",
            [],
            |row| {
                Ok(ValorInventario {
                    num_productos: row.get(0)?,
                    unidades_totales: row.get(1)?,
                    valor_costo: row.get(2)?,
                    valor_venta: row.get(3)?,
                })
            },
        )
        .map_err(|e| e.to_string())?;

    Ok(resumen)
}
