//! 数据库行映射结构

use catalog_errors::AppError;
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::domain::entities::Product;
use crate::domain::enums::Category;
use crate::domain::value_objects::ProductId;

/// 商品数据库行
#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category: Category = row.category.parse().map_err(|e| {
            AppError::database(format!("Product {} has corrupt category: {}", row.id, e))
        })?;

        Ok(Product::restore(
            ProductId(row.id),
            row.name,
            row.description,
            row.price,
            row.available,
            category,
        ))
    }
}

/// 将多行转换为领域对象
pub fn products_from_rows(rows: Vec<ProductRow>) -> Result<Vec<Product>, AppError> {
    rows.into_iter().map(Product::try_from).collect()
}
