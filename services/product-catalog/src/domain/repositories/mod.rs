//! 仓储接口模块

mod product_query;
mod product_repository;

pub use product_query::{ProductFilter, ProductQuery};
pub use product_repository::ProductRepository;

#[cfg(test)]
pub use product_repository::MockProductRepository;
