//! 商品查询
//!
//! `ProductQuery` 在调用 `count` / `fetch_all` / `first` 之前不会访问存储，
//! 因此可以继续追加过滤条件。

use std::time::Instant;

use catalog_errors::AppResult;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::entities::Product;
use crate::domain::enums::Category;
use crate::domain::repositories::ProductRepository;
use crate::infrastructure::observability::metrics::record_operation;

/// 商品过滤条件，各字段之间为 AND 关系
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub available: Option<bool>,
    pub category: Option<Category>,
    pub price: Option<Decimal>,
    pub limit: Option<u64>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// 是否没有任何谓词
    pub fn is_unfiltered(&self) -> bool {
        self.name.is_none()
            && self.available.is_none()
            && self.category.is_none()
            && self.price.is_none()
    }

    /// 判断商品是否满足谓词（不考虑 `limit`）
    pub fn matches(&self, product: &Product) -> bool {
        self.name.as_ref().is_none_or(|n| &product.name == n)
            && self.available.is_none_or(|a| product.available == a)
            && self.category.is_none_or(|c| product.category == c)
            && self.price.is_none_or(|p| product.price == p)
    }
}

/// 延迟执行的商品查询
pub struct ProductQuery<'a> {
    repo: &'a dyn ProductRepository,
    filter: ProductFilter,
}

impl<'a> ProductQuery<'a> {
    pub fn new(repo: &'a dyn ProductRepository, filter: ProductFilter) -> Self {
        Self { repo, filter }
    }

    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.filter = self.filter.with_name(name);
        self
    }

    pub fn available(mut self, available: bool) -> Self {
        self.filter = self.filter.with_available(available);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.filter = self.filter.with_category(category);
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.filter = self.filter.with_price(price);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.filter = self.filter.with_limit(limit);
        self
    }

    /// 匹配的行数，受 `limit` 约束
    pub async fn count(&self) -> AppResult<u64> {
        let start = Instant::now();
        let result = self
            .repo
            .count(&self.filter)
            .await
            .map(|total| match self.filter.limit {
                Some(limit) => total.min(limit),
                None => total,
            });
        record_operation("query_count", &result, start.elapsed());
        if let Ok(count) = &result {
            debug!(filter = ?self.filter, count, "Counted products");
        }
        result
    }

    pub async fn fetch_all(&self) -> AppResult<Vec<Product>> {
        let start = Instant::now();
        let result = self.repo.fetch(&self.filter).await;
        record_operation("query_fetch", &result, start.elapsed());
        if let Ok(products) = &result {
            debug!(filter = ?self.filter, count = products.len(), "Fetched products");
        }
        result
    }

    /// 第一个匹配的商品（按 ID）
    pub async fn first(&self) -> AppResult<Option<Product>> {
        let start = Instant::now();
        let filter = self.filter.clone().with_limit(1);
        let result = self
            .repo
            .fetch(&filter)
            .await
            .map(|products| products.into_iter().next());
        record_operation("query_first", &result, start.elapsed());
        if let Ok(product) = &result {
            debug!(filter = ?self.filter, found = product.is_some(), "Fetched first product");
        }
        result
    }

    pub async fn exists(&self) -> AppResult<bool> {
        Ok(self.first().await?.is_some())
    }
}
