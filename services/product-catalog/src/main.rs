//! product-catalog - 初始化商品表结构并报告存储健康状态

use std::sync::Arc;
use std::time::Duration;

use catalog_adapter_postgres::{HealthChecker, PostgresConfig, create_pool};
use catalog_config::AppConfig;
use catalog_telemetry::{HealthStatus, init_metrics, init_tracing, init_tracing_json};
use secrecy::ExposeSecret;
use tracing::{error, info};

use product_catalog::application::ProductCatalog;
use product_catalog::infrastructure::persistence::{
    PostgresProductRepository, init_db, schema_version,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;
    if config.telemetry.json || config.is_production() {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }
    let _metrics = if config.telemetry.metrics_enabled {
        Some(init_metrics()?)
    } else {
        None
    };

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        "Initializing product catalog..."
    );

    let pg_config = PostgresConfig::new(config.database.uri.expose_secret().as_str())
        .with_max_connections(config.database.max_connections)
        .with_min_connections(config.database.min_connections)
        .with_connect_timeout(Duration::from_secs(config.database.connect_timeout_secs));
    let pool = create_pool(&pg_config).await?;

    let migrations = init_db(&pool).await?;
    let version = schema_version(&pool).await?;
    info!(
        applied = ?migrations.applied,
        schema_version = ?version,
        "Migrations finished"
    );

    let mut status = HealthStatus::new();

    let health = HealthChecker::new(pool.clone()).check().await;
    status.add_check("postgres", health.healthy, health.error.clone());
    if let Some(version) = &health.db_version {
        info!(
            version = %version,
            latency_ms = ?health.latency_ms,
            pool_size = health.pool_status.size,
            "PostgreSQL reachable"
        );
    }

    let catalog = ProductCatalog::new(Arc::new(PostgresProductRepository::new(pool.clone())));
    match catalog.all().await {
        Ok(products) => {
            status.add_check("products", true, Some(format!("{} products", products.len())));
        }
        Err(e) => status.add_check("products", false, Some(e.to_string())),
    }

    pool.close().await;

    if !status.healthy {
        for check in status.failed_checks() {
            error!(check = %check.name, message = ?check.message, "Health check failed");
        }
        anyhow::bail!("product catalog is unhealthy");
    }

    info!("Product catalog ready");
    Ok(())
}
