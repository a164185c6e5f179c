use sqlx::SqlitePool;
use tracing::{error, info};
use zonesync_domain::config::PersistenceConfig;
use zonesync_infrastructure::database::create_pool;

pub async fn init_database(cfg: &PersistenceConfig) -> anyhow::Result<SqlitePool> {
    let database_url = format!("sqlite:{}", cfg.database_path);
    info!("Initializing database: {}", database_url);

    let pool = create_pool(&database_url, cfg.max_connections)
        .await
        .map_err(|e| {
            error!("Failed to initialize database pool: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!(
        "Database initialized successfully (max_connections={})",
        cfg.max_connections
    );

    Ok(pool)
}
