//! 枚举模块

mod category;

pub use category::{Category, UnknownCategory};
