//! Product Catalog Metrics

use std::time::Duration;

use catalog_errors::AppResult;
use metrics::{counter, histogram};

/// 记录一次商品操作
pub fn record_operation<T>(operation: &'static str, result: &AppResult<T>, elapsed: Duration) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    let labels = [("operation", operation.to_string()), ("outcome", outcome.to_string())];

    counter!("catalog_product_operations_total", &labels).increment(1);
    histogram!("catalog_product_operation_duration_seconds", "operation" => operation)
        .record(elapsed.as_secs_f64());
}
