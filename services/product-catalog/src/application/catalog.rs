//! 商品目录服务
//!
//! 对外暴露实体级操作：创建、读取、更新、删除、列表与按字段查询

use std::sync::Arc;
use std::time::Instant;

use catalog_errors::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::domain::entities::{Product, parse_price_str};
use crate::domain::enums::Category;
use crate::domain::repositories::{ProductFilter, ProductQuery, ProductRepository};
use crate::domain::value_objects::ProductId;
use crate::infrastructure::observability::metrics::record_operation;

pub struct ProductCatalog {
    repo: Arc<dyn ProductRepository>,
}

impl ProductCatalog {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    /// 持久化新商品并写回分配的 ID
    ///
    /// 已持久化（带 ID）的商品返回 `Conflict`。
    pub async fn create(&self, product: &mut Product) -> AppResult<()> {
        let start = Instant::now();
        let result = self.create_inner(product).await;
        record_operation("create", &result, start.elapsed());
        result
    }

    async fn create_inner(&self, product: &mut Product) -> AppResult<()> {
        if let Some(id) = product.id() {
            return Err(AppError::conflict(format!(
                "Product {} is already persisted",
                id
            )));
        }
        product.validate()?;

        info!(name = %product.name, "Creating product");
        let id = self.repo.create(product).await?;
        product.assign_id(id);
        info!(product_id = %id, "Product created");
        Ok(())
    }

    /// 按 ID 持久化修改后的字段
    pub async fn update(&self, product: &Product) -> AppResult<()> {
        let start = Instant::now();
        let result = self.update_inner(product).await;
        record_operation("update", &result, start.elapsed());
        result
    }

    async fn update_inner(&self, product: &Product) -> AppResult<()> {
        let id = product
            .id()
            .ok_or_else(|| AppError::validation("Update called with empty ID field"))?;
        product.validate()?;

        info!(product_id = %id, name = %product.name, "Updating product");
        self.repo.update(product).await
    }

    /// 删除商品；未持久化或行已不存在时为空操作
    pub async fn delete(&self, product: &Product) -> AppResult<()> {
        let start = Instant::now();
        let result = match product.id() {
            Some(id) => {
                info!(product_id = %id, "Deleting product");
                self.repo.delete(id).await.map(|removed| {
                    if !removed {
                        debug!(product_id = %id, "Product already absent");
                    }
                })
            }
            None => Ok(()),
        };
        record_operation("delete", &result, start.elapsed());
        result
    }

    pub async fn all(&self) -> AppResult<Vec<Product>> {
        let start = Instant::now();
        let result = self.repo.all().await;
        record_operation("all", &result, start.elapsed());
        if let Ok(products) = &result {
            debug!(count = products.len(), "Listed all products");
        }
        result
    }

    pub async fn find(&self, id: ProductId) -> AppResult<Option<Product>> {
        let start = Instant::now();
        debug!(product_id = %id, "Finding product");
        let result = self.repo.find(id).await;
        record_operation("find", &result, start.elapsed());
        result
    }

    pub fn find_by_name(&self, name: impl Into<String>) -> ProductQuery<'_> {
        self.query(ProductFilter::new().with_name(name))
    }

    pub fn find_by_availability(&self, available: bool) -> ProductQuery<'_> {
        self.query(ProductFilter::new().with_available(available))
    }

    pub fn find_by_category(&self, category: Category) -> ProductQuery<'_> {
        self.query(ProductFilter::new().with_category(category))
    }

    pub fn find_by_price(&self, price: Decimal) -> ProductQuery<'_> {
        self.query(ProductFilter::new().with_price(price))
    }

    /// 按价格字符串查询，格式与反序列化时的价格一致
    pub fn find_by_price_str(&self, price: &str) -> AppResult<ProductQuery<'_>> {
        Ok(self.find_by_price(parse_price_str(price)?))
    }

    /// 任意组合条件的查询
    pub fn query(&self, filter: ProductFilter) -> ProductQuery<'_> {
        ProductQuery::new(self.repo.as_ref(), filter)
    }

    /// 删除全部商品
    pub async fn remove_all(&self) -> AppResult<u64> {
        let start = Instant::now();
        let result = self.repo.remove_all().await;
        record_operation("remove_all", &result, start.elapsed());
        if let Ok(removed) = &result {
            info!(removed, "Removed all products");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockProductRepository;
    use mockall::predicate::eq;

    fn fedora() -> Product {
        Product::new("Fedora", "A red hat", Decimal::new(1250, 2), true, Category::Cloths)
    }

    fn catalog(repo: MockProductRepository) -> ProductCatalog {
        ProductCatalog::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().times(1).returning(|_| Ok(ProductId(11)));

        let mut product = fedora();
        catalog(repo).create(&mut product).await.unwrap();
        assert_eq!(product.id(), Some(ProductId(11)));
        assert_eq!(product.to_string(), "<Product Fedora id=[11]>");
    }

    #[tokio::test]
    async fn test_create_rejects_persisted_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let mut product = fedora();
        product.assign_id(ProductId(1));
        let err = catalog(repo).create(&mut product).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(product.id(), Some(ProductId(1)));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().never();

        let mut product = fedora();
        product.price = Decimal::new(12345, 3);
        let err = catalog(repo).create(&mut product).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(product.id(), None);
    }

    #[tokio::test]
    async fn test_create_surfaces_store_error() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .returning(|_| Err(AppError::database("connection refused")));

        let mut product = fedora();
        let err = catalog(repo).create(&mut product).await.unwrap_err();
        assert_eq!(err.kind(), "database");
        assert_eq!(product.id(), None);
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let mut repo = MockProductRepository::new();
        repo.expect_update().never();

        let err = catalog(repo).update(&fedora()).await.unwrap_err();
        assert_eq!(err.message(), "Update called with empty ID field");
    }

    #[tokio::test]
    async fn test_update_not_found_is_surfaced() {
        let mut repo = MockProductRepository::new();
        repo.expect_update()
            .returning(|_| Err(AppError::not_found("Product 9 not found")));

        let mut product = fedora();
        product.assign_id(ProductId(9));
        assert!(catalog(repo).update(&product).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_unpersisted_is_noop() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete().never();

        catalog(repo).delete(&fedora()).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_absent_row_is_ok() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete()
            .with(eq(ProductId(3)))
            .times(1)
            .returning(|_| Ok(false));

        let mut product = fedora();
        product.assign_id(ProductId(3));
        catalog(repo).delete(&product).await.unwrap();
        // 删除后对象仍可使用
        assert_eq!(product.name, "Fedora");
    }

    #[tokio::test]
    async fn test_find_by_price_str() {
        let mut repo = MockProductRepository::new();
        repo.expect_count()
            .with(eq(ProductFilter::new().with_price(Decimal::new(1250, 2))))
            .returning(|_| Ok(2));

        let catalog = catalog(repo);
        let query = catalog.find_by_price_str(" 12.50 ").unwrap();
        assert_eq!(query.count().await.unwrap(), 2);
        let query = catalog.find_by_price_str("1.25e1").unwrap();
        assert_eq!(query.count().await.unwrap(), 2);
        assert!(catalog.find_by_price_str("twelve").is_err());
    }
}
