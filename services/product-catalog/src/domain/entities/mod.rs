//! 实体模块

mod product;

pub use product::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, Product, parse_price_str};
