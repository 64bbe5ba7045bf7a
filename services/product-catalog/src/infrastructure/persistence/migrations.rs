//! 商品表迁移

use catalog_adapter_postgres::{Migration, MigrationManager, MigrationResult};
use catalog_errors::AppResult;
use sqlx::PgPool;
use tracing::info;

/// 商品服务的全部迁移
pub fn product_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "create_products",
            include_str!("../../../migrations/001_create_products.sql"),
        )
        .with_down("DROP TABLE IF EXISTS products"),
    ]
}

/// 初始化数据库表结构，可重复调用
pub async fn init_db(pool: &PgPool) -> AppResult<MigrationResult> {
    let result = MigrationManager::new(pool.clone())
        .migrate(&product_migrations())
        .await?
        .into_result()?;

    info!(
        applied = result.applied_count(),
        skipped = result.skipped.len(),
        "Product schema initialized"
    );
    Ok(result)
}

/// 当前表结构版本，未初始化时为 `None`
pub async fn schema_version(pool: &PgPool) -> AppResult<Option<i64>> {
    MigrationManager::new(pool.clone()).current_version().await
}

/// 回滚全部商品迁移（删除商品表），返回被回滚的版本
pub async fn drop_db(pool: &PgPool) -> AppResult<Vec<i64>> {
    let reverted = MigrationManager::new(pool.clone())
        .rollback_to(0, &product_migrations())
        .await?;
    info!(reverted = ?reverted, "Product schema dropped");
    Ok(reverted)
}
