//! Parametros de configuracion de la cafetera

/// Cantidad maxima de pedidos aceptados que pueden esperar a un dispenser libre
pub const DEFAULT_BACKLOG_CAPACITY: usize = 100;

/// Tiempo (en ms) que se espera a que los dispensers terminen los pedidos pendientes
/// antes de interrumpirlos al apagar la cafetera
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 5000;

/// Tiempo (en ms) que tarda un dispenser en servir una unidad de ingrediente.
/// Con 0 los pedidos se sirven apenas se descuenta el inventario.
pub const DEFAULT_PREPARATION_MS_PER_UNIT: u64 = 0;

/// Cada cuanto (en ms) se imprimen las estadisticas mientras se sirve. 0 las desactiva.
pub const DEFAULT_STATISTICS_INTERVAL_MS: u64 = 0;

/// Archivo de entrada que se usa si no se pasa ninguno por parametro
pub const DEFAULT_INPUT_PATH: &str = "machine.json";

/// Porcentaje a partir del cual se va a alertar de que se acaba un contenedor
pub const LOW_STOCK_PERCENTAGE: u64 = 20;
