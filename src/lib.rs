mod commands;
mod db;
mod models;
mod precios;
pub mod utils;

use db::{Database, SesionState};
use std::sync::Mutex;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let database = Database::new().expect("Error al inicializar la base de datos");
    let sesion_state = SesionState {
        sesion: Mutex::new(None),
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_process::init())
        .setup(|app| {
            #[cfg(desktop)]
            app.handle().plugin(tauri_plugin_updater::Builder::new().build())?;
            Ok(())
        })
        .manage(database)
        .manage(sesion_state)
        .invoke_handler(tauri::generate_handler![
            // Productos
            commands::productos::crear_producto,
            commands::productos::actualizar_producto,
            commands::productos::buscar_productos,
            commands::productos::obtener_producto,
            commands::productos::listar_productos,
            commands::productos::eliminar_producto,
            commands::productos::crear_producto_compuesto,
            commands::productos::guardar_imagen_producto,
            commands::productos::eliminar_imagen_producto,
            commands::productos::crear_categoria,
            commands::productos::listar_categorias,
            commands::productos::crear_deposito,
            commands::productos::listar_depositos,
            // Clientes
            commands::clientes::crear_cliente,
            commands::clientes::actualizar_cliente,
            commands::clientes::buscar_clientes,
            commands::clientes::listar_clientes,
            commands::clientes::eliminar_cliente,
            // Proveedores
            commands::proveedores::crear_proveedor,
            commands::proveedores::actualizar_proveedor,
            commands::proveedores::listar_proveedores,
            commands::proveedores::eliminar_proveedor,
            // Ventas
            commands::ventas::registrar_venta,
            commands::ventas::listar_ventas_dia,
            commands::ventas::obtener_venta,
            commands::ventas::anular_venta,
            // Cotizaciones
            commands::cotizaciones::crear_cotizacion,
            commands::cotizaciones::listar_cotizaciones,
            commands::cotizaciones::obtener_cotizacion,
            commands::cotizaciones::cambiar_estado_cotizacion,
            commands::cotizaciones::convertir_cotizacion_en_venta,
            // Caja
            commands::caja::abrir_caja,
            commands::caja::cerrar_caja,
            commands::caja::obtener_caja_abierta,
            commands::caja::registrar_movimiento_caja,
            commands::caja::listar_movimientos_caja,
            // Promociones
            commands::promociones::crear_promocion,
            commands::promociones::actualizar_promocion,
            commands::promociones::listar_promociones,
            commands::promociones::eliminar_promocion,
            commands::promociones::promociones_activas,
            commands::promociones::precio_vigente_producto,
            // Tareas
            commands::tareas::crear_tarea,
            commands::tareas::actualizar_tarea,
            commands::tareas::listar_tareas,
            commands::tareas::eliminar_tarea,
            // Configuración
            commands::config::obtener_config,
            commands::config::guardar_config,
            commands::config::actualizar_precios_gramo,
            // Reportes
            commands::reportes::resumen_diario,
            commands::reportes::productos_mas_vendidos,
            commands::reportes::alertas_stock_bajo,
            commands::reportes::ventas_por_dia,
            commands::reportes::valor_inventario,
            // Inventario / Kardex
            commands::inventario::registrar_movimiento,
            commands::inventario::listar_movimientos,
            commands::inventario::resumen_inventario,
            // Exportar CSV
            commands::exportar::exportar_ventas_csv,
            commands::exportar::exportar_inventario_csv,
            commands::exportar::guardar_archivo_texto,
            // Respaldo
            commands::respaldo::obtener_ruta_db,
            commands::respaldo::crear_respaldo,
            commands::respaldo::restaurar_respaldo,
            // Usuarios / Sesión
            commands::usuarios::iniciar_sesion,
            commands::usuarios::cerrar_sesion,
            commands::usuarios::obtener_sesion_actual,
            commands::usuarios::crear_usuario,
            commands::usuarios::listar_usuarios,
            commands::usuarios::actualizar_usuario,
            commands::usuarios::eliminar_usuario,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
