use crate::db::Database;
use crate::models::{Categoria, Deposito, NuevoCompuesto, Producto, ProductoBusqueda};
use crate::precios;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rusqlite::Connection;
use tauri::State;

/// Crea un producto. El desglose de precio se calcula con las tarifas por
/// gramo vigentes en config; si no trae código de barras se genera uno
/// EAN-13 del secuencial interno.
#[tauri::command]
pub fn crear_producto(db: State<Database>, mut producto: Producto) -> Result<Producto, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let tarifa_material = leer_tarifa(&conn, "precio_gramo_material")?;
    let tarifa_hechura = leer_tarifa(&conn, "precio_gramo_hechura")?;

    let desglose = precios::calcular_desglose(
        producto.peso_gramos,
        tarifa_material,
        tarifa_hechura,
        producto.margen,
    );
    producto.costo_material = desglose.costo_material;
    producto.costo_hechura = desglose.costo_hechura;
    producto.precio_costo = desglose.precio_costo;
    producto.precio_venta = desglose.precio_venta;

    if producto.codigo_barras.as_deref().unwrap_or("").is_empty() {
        producto.codigo_barras = Some(siguiente_codigo_barras(&conn)?);
    }

    conn.execute(
        "INSERT INTO productos (codigo, codigo_barras, nombre, descripcion, categoria_id,
         deposito_id, peso_gramos, costo_material, costo_hechura, margen, precio_costo,
         precio_venta, precio_minimo, stock_actual, stock_minimo, es_compuesto, activo)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, 0, ?16)",
        rusqlite::params![
            producto.codigo,
            producto.codigo_barras,
            producto.nombre,
            producto.descripcion,
            producto.categoria_id,
            producto.deposito_id,
            producto.peso_gramos,
            producto.costo_material,
            producto.costo_hechura,
            producto.margen,
            producto.precio_costo,
            producto.precio_venta,
            producto.precio_minimo,
            producto.stock_actual,
            producto.stock_minimo,
            producto.activo as i32,
        ],
    )
    .map_err(|e| e.to_string())?;

    producto.id = Some(conn.last_insert_rowid());
    producto.es_compuesto = false;
    Ok(producto)
}

/// Actualiza un producto recalculando su desglose con las tarifas vigentes.
/// El precio mínimo se guarda tal cual lo fija el usuario.
#[tauri::command]
pub fn actualizar_producto(db: State<Database>, mut producto: Producto) -> Result<Producto, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    let id = producto.id.ok_or("ID requerido para actualizar")?;

    // Los compuestos conservan su costo congelado al momento de armarse
    let es_compuesto: bool = conn
        .query_row(
            "SELECT es_compuesto FROM productos WHERE id = ?1",
            rusqlite::params![id],
            |row| row.get::<_, i32>(0).map(|v| v != 0),
        )
        .map_err(|_| "Producto no encontrado".to_string())?;

    if !es_compuesto {
        let tarifa_material = leer_tarifa(&conn, "precio_gramo_material")?;
        let tarifa_hechura = leer_tarifa(&conn, "precio_gramo_hechura")?;
        let desglose = precios::calcular_desglose(
            producto.peso_gramos,
            tarifa_material,
            tarifa_hechura,
            producto.margen,
        );
        producto.costo_material = desglose.costo_material;
        producto.costo_hechura = desglose.costo_hechura;
        producto.precio_costo = desglose.precio_costo;
        producto.precio_venta = desglose.precio_venta;
    }

    conn.execute(
        "UPDATE productos SET codigo=?1, codigo_barras=?2, nombre=?3, descripcion=?4,
         categoria_id=?5, deposito_id=?6, peso_gramos=?7, costo_material=?8,
         costo_hechura=?9, margen=?10, precio_costo=?11, precio_venta=?12,
         precio_minimo=?13, stock_actual=?14, stock_minimo=?15, activo=?16,
         updated_at=datetime('now','localtime')
         WHERE id=?17",
        rusqlite::params![
            producto.codigo,
            producto.codigo_barras,
            producto.nombre,
            producto.descripcion,
            producto.categoria_id,
            producto.deposito_id,
            producto.peso_gramos,
            producto.costo_material,
            producto.costo_hechura,
            producto.margen,
            producto.precio_costo,
            producto.precio_venta,
            producto.precio_minimo,
            producto.stock_actual,
            producto.stock_minimo,
            producto.activo as i32,
            id,
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(producto)
}

/// Crea un producto compuesto (bundle). El costo es la suma de
/// (costo componente * cantidad) y el precio de venta, si no viene manual,
/// se sugiere con 30% de recargo. Los componentes quedan como JSON en la
/// misma fila; el costo no se recalcula si luego cambia un componente.
#[tauri::command]
pub fn crear_producto_compuesto(
    db: State<Database>,
    nuevo: NuevoCompuesto,
) -> Result<Producto, String> {
    if nuevo.componentes.is_empty() {
        return Err("Un producto compuesto necesita al menos un componente".to_string());
    }

    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    // Congelar el costo unitario actual de cada componente
    let mut componentes = Vec::with_capacity(nuevo.componentes.len());
    for c in &nuevo.componentes {
        let precio_costo: f64 = conn
            .query_row(
                "SELECT precio_costo FROM productos WHERE id = ?1 AND activo = 1",
                rusqlite::params![c.producto_id],
                |row| row.get(0),
            )
            .map_err(|_| format!("Componente {} no existe o está inactivo", c.producto_id))?;

        if c.cantidad <= 0.0 {
            return Err("La cantidad de cada componente debe ser mayor a cero".to_string());
        }

        componentes.push(precios::Componente {
            producto_id: c.producto_id,
            cantidad: c.cantidad,
            precio_costo,
        });
    }

    let costo = precios::costo_compuesto(&componentes);
    let precio_venta = match nuevo.precio_venta_manual {
        Some(p) => p,
        None => precios::precio_sugerido(costo),
    };

    let componentes_json = serde_json::to_string(&componentes).map_err(|e| e.to_string())?;
    let codigo_barras = siguiente_codigo_barras(&conn)?;

    conn.execute(
        "INSERT INTO productos (codigo_barras, nombre, descripcion, categoria_id, deposito_id,
         precio_costo, precio_venta, stock_actual, es_compuesto, componentes, activo)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, 1)",
        rusqlite::params![
            codigo_barras,
            nuevo.nombre,
            nuevo.descripcion,
            nuevo.categoria_id,
            nuevo.deposito_id,
            costo,
            precio_venta,
            nuevo.stock_inicial,
            componentes_json,
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(Producto {
        id: Some(conn.last_insert_rowid()),
        codigo: None,
        codigo_barras: Some(codigo_barras),
        nombre: nuevo.nombre,
        descripcion: nuevo.descripcion,
        categoria_id: nuevo.categoria_id,
        deposito_id: nuevo.deposito_id,
        peso_gramos: 0.0,
        costo_material: 0.0,
        costo_hechura: 0.0,
        margen: 0.0,
        precio_costo: costo,
        precio_venta,
        precio_minimo: 0.0,
        stock_actual: nuevo.stock_inicial,
        stock_minimo: 0.0,
        es_compuesto: true,
        componentes: Some(componentes),
        activo: true,
    })
}

#[tauri::command]
pub fn obtener_producto(db: State<Database>, id: i64) -> Result<Producto, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    conn.query_row(
        "SELECT id, codigo, codigo_barras, nombre, descripcion, categoria_id, deposito_id,
         peso_gramos, costo_material, costo_hechura, margen, precio_costo, precio_venta,
         precio_minimo, stock_actual, stock_minimo, es_compuesto, componentes, activo
         FROM productos WHERE id = ?1",
        rusqlite::params![id],
        |row| {
            let componentes_json: Option<String> = row.get(17)?;
            Ok(Producto {
                id: Some(row.get(0)?),
                codigo: row.get(1)?,
                codigo_barras: row.get(2)?,
                nombre: row.get(3)?,
                descripcion: row.get(4)?,
                categoria_id: row.get(5)?,
                deposito_id: row.get(6)?,
                peso_gramos: row.get(7)?,
                costo_material: row.get(8)?,
                costo_hechura: row.get(9)?,
                margen: row.get(10)?,
                precio_costo: row.get(11)?,
                precio_venta: row.get(12)?,
                precio_minimo: row.get(13)?,
                stock_actual: row.get(14)?,
                stock_minimo: row.get(15)?,
                es_compuesto: row.get::<_, i32>(16)? != 0,
                componentes: componentes_json
                    .and_then(|j| serde_json::from_str(&j).ok()),
                activo: row.get::<_, i32>(18)? != 0,
            })
        },
    )
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn buscar_productos(
    db: State<Database>,
    termino: String,
) -> Result<Vec<ProductoBusqueda>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    let busqueda = format!("%{}%", termino);

    let mut stmt = conn
        .prepare(
            "SELECT p.id, p.codigo, p.codigo_barras, p.nombre, p.peso_gramos, p.precio_venta,
             p.precio_minimo, p.stock_actual, p.stock_minimo, c.nombre, d.nombre, p.es_compuesto
             FROM productos p
             LEFT JOIN categorias c ON p.categoria_id = c.id
             LEFT JOIN depositos d ON p.deposito_id = d.id
             WHERE p.activo = 1
             AND (p.nombre LIKE ?1 OR p.codigo LIKE ?1 OR p.codigo_barras LIKE ?1)
             ORDER BY p.nombre
             LIMIT 50",
        )
        .map_err(|e| e.to_string())?;

    let productos = stmt
        .query_map(rusqlite::params![busqueda], mapear_busqueda)
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(productos)
}

#[tauri::command]
pub fn listar_productos(
    db: State<Database>,
    solo_activos: bool,
) -> Result<Vec<ProductoBusqueda>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let sql = if solo_activos {
        "SELECT p.id, p.codigo, p.codigo_barras, p.nombre, p.peso_gramos, p.precio_venta,
         p.precio_minimo, p.stock_actual, p.stock_minimo, c.nombre, d.nombre, p.es_compuesto
         FROM productos p
         LEFT JOIN categorias c ON p.categoria_id = c.id
         LEFT JOIN depositos d ON p.deposito_id = d.id
         WHERE p.activo = 1 ORDER BY p.nombre"
    } else {
        "SELECT p.id, p.codigo, p.codigo_barras, p.nombre, p.peso_gramos, p.precio_venta,
         p.precio_minimo, p.stock_actual, p.stock_minimo, c.nombre, d.nombre, p.es_compuesto
         FROM productos p
         LEFT JOIN categorias c ON p.categoria_id = c.id
         LEFT JOIN depositos d ON p.deposito_id = d.id
         ORDER BY p.nombre"
    };

    let mut stmt = conn.prepare(sql).map_err(|e| e.to_string())?;

    let productos = stmt
        .query_map([], mapear_busqueda)
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(productos)
}

/// Desactiva (soft-delete) un producto
#[tauri::command]
pub fn eliminar_producto(db: State<Database>, id: i64) -> Result<(), String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let afectadas = conn
        .execute(
            "UPDATE productos SET activo = 0, updated_at = datetime('now','localtime') WHERE id = ?1",
            rusqlite::params![id],
        )
        .map_err(|e| e.to_string())?;

    if afectadas == 0 {
        return Err("Producto no encontrado".to_string());
    }
    Ok(())
}

// --- Imagen de producto ---

/// Guarda la imagen de un producto como base64 (máximo 500KB)
#[tauri::command]
pub fn guardar_imagen_producto(
    db: State<Database>,
    id: i64,
    imagen_path: String,
) -> Result<String, String> {
    let bytes = std::fs::read(&imagen_path).map_err(|e| format!("Error leyendo imagen: {}", e))?;

    if bytes.len() > 500_000 {
        return Err("La imagen es demasiado grande. Máximo 500KB.".to_string());
    }

    let b64 = BASE64.encode(&bytes);

    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    let afectadas = conn
        .execute(
            "UPDATE productos SET imagen = ?1, updated_at = datetime('now','localtime') WHERE id = ?2",
            rusqlite::params![b64, id],
        )
        .map_err(|e| e.to_string())?;

    if afectadas == 0 {
        return Err("Producto no encontrado".to_string());
    }
    Ok("Imagen guardada correctamente".to_string())
}

#[tauri::command]
pub fn eliminar_imagen_producto(db: State<Database>, id: i64) -> Result<String, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;
    conn.execute(
        "UPDATE productos SET imagen = NULL WHERE id = ?1",
        rusqlite::params![id],
    )
    .map_err(|e| e.to_string())?;

    Ok("Imagen eliminada".to_string())
}

// --- Categorías ---

#[tauri::command]
pub fn crear_categoria(db: State<Database>, categoria: Categoria) -> Result<i64, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    conn.execute(
        "INSERT INTO categorias (nombre, descripcion, activo) VALUES (?1, ?2, ?3)",
        rusqlite::params![categoria.nombre, categoria.descripcion, categoria.activo as i32],
    )
    .map_err(|e| e.to_string())?;

    Ok(conn.last_insert_rowid())
}

#[tauri::command]
pub fn listar_categorias(db: State<Database>) -> Result<Vec<Categoria>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare("SELECT id, nombre, descripcion, activo FROM categorias WHERE activo = 1 ORDER BY nombre")
        .map_err(|e| e.to_string())?;

    let categorias = stmt
        .query_map([], |row| {
            Ok(Categoria {
                id: Some(row.get(0)?),
                nombre: row.get(1)?,
                descripcion: row.get(2)?,
                activo: row.get::<_, i32>(3)? != 0,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(categorias)
}

// --- Depósitos ---

#[tauri::command]
pub fn crear_deposito(db: State<Database>, deposito: Deposito) -> Result<i64, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    conn.execute(
        "INSERT INTO depositos (nombre, direccion, activo) VALUES (?1, ?2, ?3)",
        rusqlite::params![deposito.nombre, deposito.direccion, deposito.activo as i32],
    )
    .map_err(|e| e.to_string())?;

    Ok(conn.last_insert_rowid())
}

#[tauri::command]
pub fn listar_depositos(db: State<Database>) -> Result<Vec<Deposito>, String> {
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let mut stmt = conn
        .prepare("SELECT id, nombre, direccion, activo FROM depositos WHERE activo = 1 ORDER BY nombre")
        .map_err(|e| e.to_string())?;

    let depositos = stmt
        .query_map([], |row| {
            Ok(Deposito {
                id: Some(row.get(0)?),
                nombre: row.get(1)?,
                direccion: row.get(2)?,
                activo: row.get::<_, i32>(3)? != 0,
            })
        })
        .map_err(|e| e.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    Ok(depositos)
}

// --- Helpers ---

fn mapear_busqueda(row: &rusqlite::Row) -> Result<ProductoBusqueda, rusqlite::Error> {
    Ok(ProductoBusqueda {
        id: row.get(0)?,
        codigo: row.get(1)?,
        codigo_barras: row.get(2)?,
        nombre: row.get(3)?,
        peso_gramos: row.get(4)?,
        precio_venta: row.get(5)?,
        precio_minimo: row.get(6)?,
        stock_actual: row.get(7)?,
        stock_minimo: row.get(8)?,
        categoria_nombre: row.get(9)?,
        deposito_nombre: row.get(10)?,
        es_compuesto: row.get::<_, i32>(11)? != 0,
    })
}

pub(crate) fn leer_tarifa(conn: &Connection, key: &str) -> Result<f64, String> {
    let valor: String = conn
        .query_row(
            "SELECT value FROM config WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
        )
        .map_err(|e| e.to_string())?;

    valor
        .parse::<f64>()
        .map_err(|_| format!("Valor de config '{}' no es numérico", key))
}

/// Toma el siguiente secuencial de código de barras y lo incrementa
pub(crate) fn siguiente_codigo_barras(conn: &Connection) -> Result<String, String> {
    let secuencial: i64 = conn
        .query_row(
            "SELECT CAST(value AS INTEGER) FROM config WHERE key = 'secuencial_codigo_barras'",
            [],
            |row| row.get(0),
        )
        .map_err(|e| e.to_string())?;

    conn.execute(
        "UPDATE config SET value = CAST(?1 AS TEXT) WHERE key = 'secuencial_codigo_barras'",
        rusqlite::params![secuencial + 1],
    )
    .map_err(|e| e.to_string())?;

    Ok(precios::generar_codigo_barras(secuencial))
}
