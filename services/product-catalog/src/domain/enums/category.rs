//! 商品类别枚举

use std::fmt;
use std::str::FromStr;

use catalog_errors::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 商品类别
///
/// 以大写名称（如 `CLOTHS`）持久化和序列化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    #[default]
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Unknown => "UNKNOWN",
            Category::Cloths => "CLOTHS",
            Category::Food => "FOOD",
            Category::Housewares => "HOUSEWARES",
            Category::Automotive => "AUTOMOTIVE",
            Category::Tools => "TOOLS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知的类别名称
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid attribute: {0}")]
pub struct UnknownCategory(pub String);

impl From<UnknownCategory> for AppError {
    fn from(err: UnknownCategory) -> Self {
        AppError::validation(err.to_string())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl From<i32> for Category {
    fn from(value: i32) -> Self {
        match value {
            1 => Category::Cloths,
            2 => Category::Food,
            3 => Category::Housewares,
            4 => Category::Automotive,
            5 => Category::Tools,
            _ => Category::Unknown,
        }
    }
}

impl From<Category> for i32 {
    fn from(category: Category) -> Self {
        match category {
            Category::Unknown => 0,
            Category::Cloths => 1,
            Category::Food => 2,
            Category::Housewares => 3,
            Category::Automotive => 4,
            Category::Tools => 5,
        }
    }
}
