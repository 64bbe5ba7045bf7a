//! PostgreSQL repository implementation

use async_trait::async_trait;
use catalog_adapter_postgres::map_sqlx_error;
use catalog_errors::{AppError, AppResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::domain::entities::Product;
use crate::domain::repositories::{ProductFilter, ProductRepository};
use crate::domain::value_objects::ProductId;

use super::rows::{ProductRow, products_from_rows};

const SELECT_PRODUCTS: &str =
    "SELECT id, name, description, price, available, category FROM products";

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// 追加 WHERE 子句
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    let mut prefix = " WHERE ";

    if let Some(name) = &filter.name {
        builder.push(prefix).push("name = ").push_bind(name.clone());
        prefix = " AND ";
    }
    if let Some(available) = filter.available {
        builder.push(prefix).push("available = ").push_bind(available);
        prefix = " AND ";
    }
    if let Some(category) = filter.category {
        builder.push(prefix).push("category = ").push_bind(category.as_str());
        prefix = " AND ";
    }
    if let Some(price) = filter.price {
        builder.push(prefix).push("price = ").push_bind(price);
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: &Product) -> AppResult<ProductId> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO products (name, description, price, available, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.available)
        .bind(product.category.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to create product", e))?;

        Ok(ProductId(id))
    }

    async fn update(&self, product: &Product) -> AppResult<()> {
        let id = product
            .id()
            .ok_or_else(|| AppError::validation("Update called with empty ID field"))?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = $2,
                description = $3,
                price = $4,
                available = $5,
                category = $6
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.available)
        .bind(product.category.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to update product", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Product {} not found", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete product", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, id: ProductId) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{} WHERE id = $1", SELECT_PRODUCTS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to find product", e))?;

        row.map(Product::try_from).transpose()
    }

    async fn all(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{} ORDER BY id", SELECT_PRODUCTS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to list products", e))?;

        products_from_rows(rows)
    }

    async fn fetch(&self, filter: &ProductFilter) -> AppResult<Vec<Product>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_PRODUCTS);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY id");
        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        debug!(sql = %builder.sql(), "Fetching products");

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to query products", e))?;

        products_from_rows(rows)
    }

    async fn count(&self, filter: &ProductFilter) -> AppResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to count products", e))?;

        Ok(count as u64)
    }

    async fn remove_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to remove products", e))?;

        Ok(result.rows_affected())
    }
}
