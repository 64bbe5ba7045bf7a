//! PostgreSQL 健康检查模块

use std::time::{Duration, Instant};

use catalog_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::{debug, error};

/// 健康检查结果
#[derive(Debug, Clone)]
pub struct HealthCheckResult {
    pub healthy: bool,
    /// 延迟（毫秒）
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
    pub pool_status: PoolHealthStatus,
    /// 数据库版本
    pub db_version: Option<String>,
}

/// 连接池健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolHealthStatus {
    pub size: u32,
    pub idle: u32,
    pub active: u32,
}

impl PoolHealthStatus {
    fn from_counts(size: u32, idle: u32) -> Self {
        Self {
            size,
            idle,
            active: size.saturating_sub(idle),
        }
    }
}

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// 健康检查器
pub struct HealthChecker {
    pool: PgPool,
}

impl HealthChecker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取连接池状态
    pub fn pool_status(&self) -> PoolHealthStatus {
        PoolHealthStatus::from_counts(self.pool.size(), self.pool.num_idle() as u32)
    }

    /// 执行健康检查
    pub async fn check(&self) -> HealthCheckResult {
        let start = Instant::now();

        match tokio::time::timeout(CHECK_TIMEOUT, self.server_version()).await {
            Ok(Ok(db_version)) => {
                let latency = start.elapsed().as_millis() as u64;
                debug!(latency_ms = latency, "PostgreSQL health check passed");
                HealthCheckResult {
                    healthy: true,
                    latency_ms: Some(latency),
                    error: None,
                    pool_status: self.pool_status(),
                    db_version: Some(db_version),
                }
            }
            Ok(Err(e)) => {
                error!(error = %e, "PostgreSQL health check failed");
                self.unhealthy(e.to_string())
            }
            Err(_) => {
                error!("PostgreSQL health check timed out");
                self.unhealthy("Health check timed out".to_string())
            }
        }
    }

    fn unhealthy(&self, error: String) -> HealthCheckResult {
        HealthCheckResult {
            healthy: false,
            latency_ms: None,
            error: Some(error),
            pool_status: self.pool_status(),
            db_version: None,
        }
    }

    async fn server_version(&self) -> AppResult<String> {
        let row: (String,) = sqlx::query_as("SELECT version()")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Health check failed: {}", e)))?;

        Ok(row.0)
    }
}
