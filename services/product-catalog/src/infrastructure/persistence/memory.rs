//! 内存仓储实现
//!
//! 与 PostgreSQL 实现语义一致：ID 自增且不复用，列表按 ID 升序。

use std::collections::BTreeMap;

use async_trait::async_trait;
use catalog_errors::{AppError, AppResult};
use tokio::sync::RwLock;

use crate::domain::entities::Product;
use crate::domain::repositories::{ProductFilter, ProductRepository};
use crate::domain::value_objects::ProductId;

#[derive(Debug, Default)]
struct Storage {
    rows: BTreeMap<ProductId, Product>,
    last_id: i32,
}

#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    storage: RwLock<Storage>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: &Product) -> AppResult<ProductId> {
        let mut storage = self.storage.write().await;
        let next = storage
            .last_id
            .checked_add(1)
            .ok_or_else(|| AppError::database("Product id sequence exhausted"))?;
        storage.last_id = next;

        let id = ProductId(next);
        let mut row = product.clone();
        row.assign_id(id);
        storage.rows.insert(id, row);
        Ok(id)
    }

    async fn update(&self, product: &Product) -> AppResult<()> {
        let id = product
            .id()
            .ok_or_else(|| AppError::validation("Update called with empty ID field"))?;

        let mut storage = self.storage.write().await;
        match storage.rows.get_mut(&id) {
            Some(row) => {
                *row = product.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!("Product {} not found", id))),
        }
    }

    async fn delete(&self, id: ProductId) -> AppResult<bool> {
        Ok(self.storage.write().await.rows.remove(&id).is_some())
    }

    async fn find(&self, id: ProductId) -> AppResult<Option<Product>> {
        Ok(self.storage.read().await.rows.get(&id).cloned())
    }

    async fn all(&self) -> AppResult<Vec<Product>> {
        Ok(self.storage.read().await.rows.values().cloned().collect())
    }

    async fn fetch(&self, filter: &ProductFilter) -> AppResult<Vec<Product>> {
        let storage = self.storage.read().await;
        let matching = storage.rows.values().filter(|p| filter.matches(p)).cloned();
        Ok(match filter.limit {
            Some(limit) => matching.take(limit as usize).collect(),
            None => matching.collect(),
        })
    }

    async fn count(&self, filter: &ProductFilter) -> AppResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.rows.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn remove_all(&self) -> AppResult<u64> {
        let mut storage = self.storage.write().await;
        let removed = storage.rows.len() as u64;
        storage.rows.clear();
        Ok(removed)
    }
}
