use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vehicle_catalog::{
    config::EnvironmentConfig, create_app, database::DatabaseConnection, state::AppState,
    API_PREFIX,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging (RUST_LOG tiene prioridad)
    let default_filter = if config.is_production() {
        "info"
    } else {
        "vehicle_catalog=debug,tower_http=info,sqlx=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚗 Vehicle Catalog API");
    info!("================================================");
    info!("⚙️ Entorno: {}", config.environment);

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };
    db_connection.run_migrations().await?;

    tokio::fs::create_dir_all(&config.media_root)
        .await
        .with_context(|| format!("No se pudo crear {}", config.media_root.display()))?;

    let bind_addr = format!("{}:{}", config.host, config.port);
    let server_url = config.server_url();

    let app_state = AppState::new(db_connection.pool().clone(), config);
    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("No se pudo abrir {}", bind_addr))?;

    info!("🌐 Servidor iniciando en {}", server_url);
    info!("🔍 Índice de endpoints: GET {}/", API_PREFIX);
    info!("❤️ Health check: GET /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Error del servidor")?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("No se pudo instalar el manejador de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
