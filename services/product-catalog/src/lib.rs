//! product-catalog - 商品目录数据访问层

pub mod application;
pub mod domain;
pub mod infrastructure;
