//! ID 值对象

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 商品 ID，由数据库在创建时分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct ProductId(pub i32);

impl ProductId {
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}
