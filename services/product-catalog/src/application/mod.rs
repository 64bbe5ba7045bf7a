//! 应用层

mod catalog;

pub use catalog::ProductCatalog;
