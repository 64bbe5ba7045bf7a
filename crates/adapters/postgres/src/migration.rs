//! PostgreSQL 迁移管理模块
//!
//! 迁移按版本号升序执行，`_migrations` 表记录已执行的版本与 SQL 校验和。
//! 计划（待执行 / 跳过 / 校验和不一致）与执行分离，计划部分不依赖数据库。

use std::collections::HashMap;

use catalog_errors::{AppError, AppResult};
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};

const CREATE_TRACKING_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        version BIGINT PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        checksum VARCHAR(64) NOT NULL
    )
"#;

const SELECT_APPLIED: &str =
    "SELECT version, name, applied_at, checksum FROM _migrations ORDER BY version";
const INSERT_APPLIED: &str =
    "INSERT INTO _migrations (version, name, checksum) VALUES ($1, $2, $3)";
const DELETE_APPLIED: &str = "DELETE FROM _migrations WHERE version = $1";

/// `_migrations` 中的一行
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: chrono::DateTime<chrono::Utc>,
    pub checksum: String,
}

/// 迁移定义
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    /// 可包含多条语句
    pub up_sql: String,
    pub down_sql: Option<String>,
    /// `up_sql` 的 SHA-256（十六进制）
    pub checksum: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, up_sql: impl Into<String>) -> Self {
        let up_sql = up_sql.into();
        let checksum = hex::encode(Sha256::digest(up_sql.as_bytes()));
        Self {
            version,
            name: name.into(),
            up_sql,
            down_sql: None,
            checksum,
        }
    }

    pub fn with_down(mut self, down_sql: impl Into<String>) -> Self {
        self.down_sql = Some(down_sql.into());
        self
    }

    fn failure(&self, error: impl Into<String>) -> MigrationError {
        MigrationError {
            version: self.version,
            name: self.name.clone(),
            error: error.into(),
        }
    }
}

/// 对比已执行记录得到的执行计划
#[derive(Debug, Default)]
pub struct MigrationPlan<'a> {
    /// 按版本升序
    pub pending: Vec<&'a Migration>,
    pub skipped: Vec<i64>,
    /// 已执行但 SQL 已被修改的迁移
    pub mismatched: Vec<MigrationError>,
}

impl<'a> MigrationPlan<'a> {
    pub fn new(applied: &[MigrationRecord], migrations: &'a [Migration]) -> Self {
        let applied: HashMap<i64, &str> = applied
            .iter()
            .map(|r| (r.version, r.checksum.as_str()))
            .collect();

        let mut sorted: Vec<&Migration> = migrations.iter().collect();
        sorted.sort_by_key(|m| m.version);

        let mut plan = Self::default();
        for migration in sorted {
            match applied.get(&migration.version) {
                None => plan.pending.push(migration),
                Some(checksum) if *checksum == migration.checksum => {
                    plan.skipped.push(migration.version)
                }
                Some(_) => plan.mismatched.push(
                    migration.failure("Checksum mismatch - migration has been modified"),
                ),
            }
        }
        plan
    }
}

/// 回滚到 `target_version`（不含）需要撤销的迁移，按版本降序
///
/// 任一迁移缺少定义或 down SQL 时整体失败，不会部分回滚。
pub fn rollback_plan<'a>(
    applied: &[MigrationRecord],
    target_version: i64,
    migrations: &'a [Migration],
) -> AppResult<Vec<&'a Migration>> {
    let mut versions: Vec<i64> = applied
        .iter()
        .map(|r| r.version)
        .filter(|v| *v > target_version)
        .collect();
    versions.sort_unstable_by(|a, b| b.cmp(a));

    versions
        .into_iter()
        .map(|version| {
            let migration = migrations
                .iter()
                .find(|m| m.version == version)
                .ok_or_else(|| AppError::internal(format!("Migration {} is unknown", version)))?;
            if migration.down_sql.is_none() {
                return Err(AppError::internal(format!(
                    "Migration {} ({}) has no down SQL",
                    migration.version, migration.name
                )));
            }
            Ok(migration)
        })
        .collect()
}

/// 迁移管理器
pub struct MigrationManager {
    pool: PgPool,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建 `_migrations` 表（已存在则跳过）
    pub async fn init(&self) -> AppResult<()> {
        sqlx::raw_sql(CREATE_TRACKING_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create migration table: {}", e)))?;
        Ok(())
    }

    pub async fn applied(&self) -> AppResult<Vec<MigrationRecord>> {
        sqlx::query_as::<_, MigrationRecord>(SELECT_APPLIED)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load applied migrations: {}", e)))
    }

    /// 最高已执行版本，无记录时为 `None`
    pub async fn current_version(&self) -> AppResult<Option<i64>> {
        self.init().await?;
        Ok(self.applied().await?.last().map(|r| r.version))
    }

    /// 执行全部待执行迁移，遇到第一个失败即停止
    pub async fn migrate(&self, migrations: &[Migration]) -> AppResult<MigrationResult> {
        self.init().await?;
        let applied = self.applied().await?;
        let plan = MigrationPlan::new(&applied, migrations);

        let mut result = MigrationResult {
            skipped: plan.skipped,
            errors: plan.mismatched,
            ..Default::default()
        };
        for migration in &result.errors {
            warn!(version = migration.version, name = %migration.name, "{}", migration.error);
        }

        for migration in plan.pending {
            match self.apply(migration).await {
                Ok(()) => result.applied.push(migration.version),
                Err(e) => {
                    result.errors.push(migration.failure(e.to_string()));
                    break;
                }
            }
        }

        Ok(result)
    }

    /// 回滚所有版本号大于 `target_version` 的迁移，返回被回滚的版本（降序）
    pub async fn rollback_to(
        &self,
        target_version: i64,
        migrations: &[Migration],
    ) -> AppResult<Vec<i64>> {
        self.init().await?;
        let applied = self.applied().await?;

        let mut reverted = Vec::new();
        for migration in rollback_plan(&applied, target_version, migrations)? {
            self.revert(migration).await?;
            reverted.push(migration.version);
        }
        Ok(reverted)
    }

    async fn apply(&self, migration: &Migration) -> AppResult<()> {
        let mut tx = self.begin().await?;

        sqlx::raw_sql(&migration.up_sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migration: {}", e)))?;
        sqlx::query(INSERT_APPLIED)
            .bind(migration.version)
            .bind(&migration.name)
            .bind(&migration.checksum)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to record migration: {}", e)))?;

        Self::commit(tx).await?;
        info!(version = migration.version, name = %migration.name, "Migration applied");
        Ok(())
    }

    async fn revert(&self, migration: &Migration) -> AppResult<()> {
        let down_sql = migration.down_sql.as_deref().unwrap_or_default();
        let mut tx = self.begin().await?;

        sqlx::raw_sql(down_sql).execute(&mut *tx).await.map_err(|e| {
            AppError::database(format!(
                "Failed to roll back migration {}: {}",
                migration.version, e
            ))
        })?;
        sqlx::query(DELETE_APPLIED)
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to unrecord migration: {}", e)))?;

        Self::commit(tx).await?;
        info!(version = migration.version, name = %migration.name, "Migration rolled back");
        Ok(())
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))
    }

    async fn commit(tx: Transaction<'static, Postgres>) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit migration: {}", e)))
    }
}

/// 迁移结果
#[derive(Debug, Clone, Default)]
pub struct MigrationResult {
    pub applied: Vec<i64>,
    pub skipped: Vec<i64>,
    pub errors: Vec<MigrationError>,
}

impl MigrationResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    /// 存在失败的迁移时转为错误
    pub fn into_result(self) -> AppResult<Self> {
        match self.errors.first() {
            None => Ok(self),
            Some(first) => Err(AppError::database(format!(
                "Migration {} ({}) failed: {}",
                first.version, first.name, first.error
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationError {
    pub version: i64,
    pub name: String,
    pub error: String,
}
