//! sqlx 错误到 AppError 的映射

use catalog_errors::AppError;
use sqlx::error::ErrorKind;

/// 将 sqlx 错误映射为 AppError
///
/// 约束冲突映射为 `Conflict`，`RowNotFound` 映射为 `NotFound`，其余为 `Database`。
/// `context` 描述失败的操作，会作为错误信息前缀。
pub fn map_sqlx_error(context: &str, err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::not_found(format!("{}: {}", context, err)),
        sqlx::Error::Database(db_err) => match db_err.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => {
                AppError::conflict(format!("{}: {}", context, db_err.message()))
            }
            _ => AppError::database(format!("{}: {}", context, err)),
        },
        _ => AppError::database(format!("{}: {}", context, err)),
    }
}
