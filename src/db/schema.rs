use rusqlite::Connection;

pub fn create_tables(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        -- Configuración del negocio
        CREATE TABLE IF NOT EXISTS config (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Categorías de productos
        CREATE TABLE IF NOT EXISTS categorias (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            descripcion TEXT,
            activo INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );

        -- Depósitos / bodegas
        CREATE TABLE IF NOT EXISTS depositos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL UNIQUE,
            direccion TEXT,
            activo INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );

        -- Productos
        CREATE TABLE IF NOT EXISTS productos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            codigo TEXT UNIQUE,
            codigo_barras TEXT UNIQUE,
            nombre TEXT NOT NULL,
            descripcion TEXT,
            categoria_id INTEGER,
            deposito_id INTEGER,
            peso_gramos REAL NOT NULL DEFAULT 0,
            costo_material REAL NOT NULL DEFAULT 0,
            costo_hechura REAL NOT NULL DEFAULT 0,
            margen REAL NOT NULL DEFAULT 0,
            precio_costo REAL NOT NULL DEFAULT 0,
            precio_venta REAL NOT NULL DEFAULT 0,
            precio_minimo REAL NOT NULL DEFAULT 0,
            stock_actual REAL NOT NULL DEFAULT 0,
            stock_minimo REAL NOT NULL DEFAULT 0,
            es_compuesto INTEGER NOT NULL DEFAULT 0,
            componentes TEXT,
            imagen TEXT,
            activo INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            FOREIGN KEY (categoria_id) REFERENCES categorias(id),
            FOREIGN KEY (deposito_id) REFERENCES depositos(id)
        );

        CREATE INDEX IF NOT EXISTS idx_productos_codigo ON productos(codigo);
        CREATE INDEX IF NOT EXISTS idx_productos_codigo_barras ON productos(codigo_barras);
        CREATE INDEX IF NOT EXISTS idx_productos_nombre ON productos(nombre);
        CREATE INDEX IF NOT EXISTS idx_productos_categoria ON productos(categoria_id);

        -- Clientes
        CREATE TABLE IF NOT EXISTS clientes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            identificacion TEXT UNIQUE,
            nombre TEXT NOT NULL,
            direccion TEXT,
            telefono TEXT,
            email TEXT,
            observacion TEXT,
            activo INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );

        CREATE INDEX IF NOT EXISTS idx_clientes_identificacion ON clientes(identificacion);
        CREATE INDEX IF NOT EXISTS idx_clientes_nombre ON clientes(nombre);

        -- Proveedores
        CREATE TABLE IF NOT EXISTS proveedores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            identificacion TEXT UNIQUE,
            nombre TEXT NOT NULL,
            contacto TEXT,
            direccion TEXT,
            telefono TEXT,
            email TEXT,
            activo INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );

        CREATE INDEX IF NOT EXISTS idx_proveedores_nombre ON proveedores(nombre);

        -- Ventas (cabecera)
        CREATE TABLE IF NOT EXISTS ventas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            numero TEXT UNIQUE NOT NULL,
            cliente_id INTEGER,
            fecha TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            subtotal REAL NOT NULL DEFAULT 0,
            descuento REAL NOT NULL DEFAULT 0,
            total REAL NOT NULL DEFAULT 0,
            forma_pago TEXT NOT NULL DEFAULT 'EFECTIVO',
            monto_recibido REAL NOT NULL DEFAULT 0,
            cambio REAL NOT NULL DEFAULT 0,
            estado TEXT NOT NULL DEFAULT 'COMPLETADA',
            usuario TEXT,
            usuario_id INTEGER,
            observacion TEXT,
            anulada INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            FOREIGN KEY (cliente_id) REFERENCES clientes(id)
        );

        CREATE INDEX IF NOT EXISTS idx_ventas_numero ON ventas(numero);
        CREATE INDEX IF NOT EXISTS idx_ventas_fecha ON ventas(fecha);
        CREATE INDEX IF NOT EXISTS idx_ventas_cliente ON ventas(cliente_id);

        -- Detalle de ventas
        CREATE TABLE IF NOT EXISTS venta_detalles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            venta_id INTEGER NOT NULL,
            producto_id INTEGER NOT NULL,
            cantidad REAL NOT NULL,
            precio_unitario REAL NOT NULL,
            descuento REAL NOT NULL DEFAULT 0,
            subtotal REAL NOT NULL,
            FOREIGN KEY (venta_id) REFERENCES ventas(id) ON DELETE CASCADE,
            FOREIGN KEY (producto_id) REFERENCES productos(id)
        );

        CREATE INDEX IF NOT EXISTS idx_venta_detalles_venta ON venta_detalles(venta_id);

        -- Cotizaciones (cabecera)
        CREATE TABLE IF NOT EXISTS cotizaciones (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            numero TEXT UNIQUE NOT NULL,
            cliente_id INTEGER,
            fecha TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            valida_hasta TEXT,
            subtotal REAL NOT NULL DEFAULT 0,
            descuento REAL NOT NULL DEFAULT 0,
            total REAL NOT NULL DEFAULT 0,
            estado TEXT NOT NULL DEFAULT 'PENDIENTE',
            venta_id INTEGER,
            usuario TEXT,
            observacion TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            FOREIGN KEY (cliente_id) REFERENCES clientes(id)
        );

        CREATE INDEX IF NOT EXISTS idx_cotizaciones_fecha ON cotizaciones(fecha);
        CREATE INDEX IF NOT EXISTS idx_cotizaciones_estado ON cotizaciones(estado);

        CREATE TABLE IF NOT EXISTS cotizacion_detalles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cotizacion_id INTEGER NOT NULL,
            producto_id INTEGER NOT NULL,
            cantidad REAL NOT NULL,
            precio_unitario REAL NOT NULL,
            descuento REAL NOT NULL DEFAULT 0,
            subtotal REAL NOT NULL,
            FOREIGN KEY (cotizacion_id) REFERENCES cotizaciones(id) ON DELETE CASCADE,
            FOREIGN KEY (producto_id) REFERENCES productos(id)
        );

        CREATE INDEX IF NOT EXISTS idx_cotizacion_detalles_cot ON cotizacion_detalles(cotizacion_id);

        -- Promociones
        CREATE TABLE IF NOT EXISTS promociones (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            producto_id INTEGER NOT NULL,
            tipo TEXT NOT NULL,
            valor REAL NOT NULL DEFAULT 0,
            fecha_inicio TEXT NOT NULL,
            fecha_fin TEXT NOT NULL,
            descripcion TEXT,
            activo INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            FOREIGN KEY (producto_id) REFERENCES productos(id)
        );

        CREATE INDEX IF NOT EXISTS idx_promociones_producto ON promociones(producto_id);
        CREATE INDEX IF NOT EXISTS idx_promociones_fechas ON promociones(fecha_inicio, fecha_fin);

        -- Caja (apertura y cierre)
        CREATE TABLE IF NOT EXISTS caja (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fecha_apertura TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            fecha_cierre TEXT,
            monto_inicial REAL NOT NULL DEFAULT 0,
            monto_ventas REAL NOT NULL DEFAULT 0,
            monto_esperado REAL NOT NULL DEFAULT 0,
            monto_real REAL,
            diferencia REAL,
            estado TEXT NOT NULL DEFAULT 'ABIERTA',
            usuario TEXT,
            usuario_id INTEGER,
            observacion TEXT
        );

        -- Movimientos manuales de caja (ingresos / egresos)
        CREATE TABLE IF NOT EXISTS movimientos_caja (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            caja_id INTEGER NOT NULL,
            tipo TEXT NOT NULL,
            descripcion TEXT NOT NULL,
            monto REAL NOT NULL,
            fecha TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            usuario TEXT,
            FOREIGN KEY (caja_id) REFERENCES caja(id)
        );

        CREATE INDEX IF NOT EXISTS idx_movimientos_caja ON movimientos_caja(caja_id);

        -- Tareas del equipo
        CREATE TABLE IF NOT EXISTS tareas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            titulo TEXT NOT NULL,
            descripcion TEXT,
            asignado_id INTEGER,
            fecha_limite TEXT,
            estado TEXT NOT NULL DEFAULT 'PENDIENTE',
            prioridad TEXT NOT NULL DEFAULT 'NORMAL',
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            FOREIGN KEY (asignado_id) REFERENCES usuarios(id)
        );

        CREATE INDEX IF NOT EXISTS idx_tareas_estado ON tareas(estado);

        -- Movimientos de inventario (kardex)
        CREATE TABLE IF NOT EXISTS movimientos_inventario (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            producto_id INTEGER NOT NULL,
            tipo TEXT NOT NULL,
            cantidad REAL NOT NULL,
            stock_anterior REAL NOT NULL,
            stock_nuevo REAL NOT NULL,
            costo_unitario REAL,
            referencia_id INTEGER,
            motivo TEXT,
            usuario TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            FOREIGN KEY (producto_id) REFERENCES productos(id)
        );

        CREATE INDEX IF NOT EXISTS idx_movimientos_producto ON movimientos_inventario(producto_id);

        -- Usuarios / Equipo
        CREATE TABLE IF NOT EXISTS usuarios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL UNIQUE,
            pin_hash TEXT NOT NULL,
            pin_salt TEXT NOT NULL,
            rol TEXT NOT NULL DEFAULT 'EQUIPO',
            activo INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );

        -- Insertar consumidor final por defecto
        INSERT OR IGNORE INTO clientes (id, identificacion, nombre)
        VALUES (1, '9999999999', 'CONSUMIDOR FINAL');

        -- Depósito principal por defecto
        INSERT OR IGNORE INTO depositos (id, nombre) VALUES (1, 'PRINCIPAL');

        -- Insertar configuración inicial
        INSERT OR IGNORE INTO config (key, value) VALUES ('nombre_negocio', 'Mi Taller');
        INSERT OR IGNORE INTO config (key, value) VALUES ('direccion', '');
        INSERT OR IGNORE INTO config (key, value) VALUES ('telefono', '');
        INSERT OR IGNORE INTO config (key, value) VALUES ('moneda', 'USD');
        INSERT OR IGNORE INTO config (key, value) VALUES ('precio_gramo_material', '0');
        INSERT OR IGNORE INTO config (key, value) VALUES ('precio_gramo_hechura', '0');
        INSERT OR IGNORE INTO config (key, value) VALUES ('secuencial_venta', '1');
        INSERT OR IGNORE INTO config (key, value) VALUES ('secuencial_cotizacion', '1');
        INSERT OR IGNORE INTO config (key, value) VALUES ('secuencial_codigo_barras', '1');
        INSERT OR IGNORE INTO config (key, value) VALUES ('timeout_inactividad', '15');
        ",
    )?;

    Ok(())
}
