//! 商品仓储接口

use async_trait::async_trait;
use catalog_errors::AppResult;

use crate::domain::entities::Product;
use crate::domain::repositories::ProductFilter;
use crate::domain::value_objects::ProductId;

/// 商品仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 插入新行并返回分配的 ID（忽略 `product` 上已有的 ID）
    async fn create(&self, product: &Product) -> AppResult<ProductId>;

    /// 按 ID 更新全部字段，行不存在时返回 `NotFound`
    async fn update(&self, product: &Product) -> AppResult<()>;

    /// 删除商品，返回是否确实删除了一行
    async fn delete(&self, id: ProductId) -> AppResult<bool>;

    /// 根据 ID 查找
    async fn find(&self, id: ProductId) -> AppResult<Option<Product>>;

    /// 全部商品，按 ID 升序
    async fn all(&self) -> AppResult<Vec<Product>>;

    /// 按过滤条件查询，按 ID 升序
    async fn fetch(&self, filter: &ProductFilter) -> AppResult<Vec<Product>>;

    /// 统计满足过滤条件的行数（忽略 `limit`）
    async fn count(&self, filter: &ProductFilter) -> AppResult<u64>;

    /// 删除全部商品，返回删除行数
    async fn remove_all(&self) -> AppResult<u64>;
}
