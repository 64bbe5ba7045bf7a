//! 测试辅助：商品工厂与两种仓储共用的测试场景
#![allow(dead_code)]

use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;

use product_catalog::application::ProductCatalog;
use product_catalog::domain::{Category, Product};

const NAMES: &[&str] = &[
    "Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels", "Ford", "Chevy", "Hammer",
    "Wrench",
];

/// 生成一个随机商品（未持久化）
pub fn product_factory() -> Product {
    let mut rng = rand::thread_rng();
    let name = *NAMES.choose(&mut rng).unwrap();
    // 0.50 ~ 2000.00，两位小数
    let price = Decimal::new(rng.gen_range(50..=200_000), 2);
    let category = *Category::ALL.choose(&mut rng).unwrap();

    Product::new(
        name,
        format!("{} number {}", name, rng.gen_range(1..10_000)),
        price,
        rng.gen_bool(0.5),
        category,
    )
}

pub fn product_batch(size: usize) -> Vec<Product> {
    (0..size).map(|_| product_factory()).collect()
}

async fn create_batch(catalog: &ProductCatalog, size: usize) -> Vec<Product> {
    let mut batch = product_batch(size);
    for product in batch.iter_mut() {
        catalog.create(product).await.unwrap();
    }
    batch
}

// ============================================================
// 共用测试场景
// ============================================================

pub async fn it_should_add_a_product(catalog: &ProductCatalog) {
    assert!(catalog.all().await.unwrap().is_empty());

    let mut product = product_factory();
    catalog.create(&mut product).await.unwrap();
    assert!(product.id().is_some());

    let products = catalog.all().await.unwrap();
    assert_eq!(products.len(), 1);

    let new_product = &products[0];
    assert_eq!(new_product.id(), product.id());
    assert_eq!(new_product.name, product.name);
    assert_eq!(new_product.description, product.description);
    assert_eq!(new_product.price, product.price);
    assert_eq!(new_product.available, product.available);
    assert_eq!(new_product.category, product.category);
}

pub async fn it_should_read_a_product(catalog: &ProductCatalog) {
    let mut product = product_factory();
    catalog.create(&mut product).await.unwrap();
    let id = product.id().unwrap();

    let found = catalog.find(id).await.unwrap().expect("product should exist");
    assert_eq!(found, product);
}

pub async fn it_should_not_find_a_missing_product(catalog: &ProductCatalog) {
    let mut product = product_factory();
    catalog.create(&mut product).await.unwrap();
    let id = product.id().unwrap();
    catalog.delete(&product).await.unwrap();

    assert!(catalog.find(id).await.unwrap().is_none());
}

pub async fn it_should_update_a_product(catalog: &ProductCatalog) {
    let mut product = product_factory();
    catalog.create(&mut product).await.unwrap();
    let original_id = product.id();
    let original_name = product.name.clone();

    product.description = "New text added".to_string();
    catalog.update(&product).await.unwrap();
    assert_eq!(product.id(), original_id);

    let products = catalog.all().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id(), original_id);
    assert_eq!(products[0].description, "New text added");
    assert_eq!(products[0].name, original_name);
}

pub async fn it_should_not_update_without_id(catalog: &ProductCatalog) {
    let product = product_factory();
    let err = catalog.update(&product).await.unwrap_err();
    assert_eq!(err.message(), "Update called with empty ID field");
}

pub async fn it_should_not_update_a_deleted_product(catalog: &ProductCatalog) {
    let mut product = product_factory();
    catalog.create(&mut product).await.unwrap();
    catalog.delete(&product).await.unwrap();

    product.name = "Ghost".to_string();
    assert!(catalog.update(&product).await.unwrap_err().is_not_found());
}

pub async fn it_should_not_create_twice(catalog: &ProductCatalog) {
    let mut product = product_factory();
    catalog.create(&mut product).await.unwrap();
    let id = product.id();

    assert!(catalog.create(&mut product).await.is_err());
    assert_eq!(product.id(), id);
    assert_eq!(catalog.all().await.unwrap().len(), 1);
}

pub async fn it_should_delete_a_product(catalog: &ProductCatalog) {
    let mut product = product_factory();
    catalog.create(&mut product).await.unwrap();
    assert_eq!(catalog.all().await.unwrap().len(), 1);

    catalog.delete(&product).await.unwrap();
    assert!(catalog.all().await.unwrap().is_empty());

    // 再次删除为空操作，对象仍可使用
    catalog.delete(&product).await.unwrap();
    assert!(product.id().is_some());
}

pub async fn it_should_list_all_products(catalog: &ProductCatalog) {
    assert!(catalog.all().await.unwrap().is_empty());
    let batch = create_batch(catalog, 5).await;

    let products = catalog.all().await.unwrap();
    assert_eq!(products.len(), 5);
    let ids: Vec<_> = products.iter().map(|p| p.id()).collect();
    let expected: Vec<_> = batch.iter().map(|p| p.id()).collect();
    assert_eq!(ids, expected);
}

pub async fn it_should_find_by_name(catalog: &ProductCatalog) {
    let batch = create_batch(catalog, 5).await;
    let name = batch[0].name.clone();
    let count = batch.iter().filter(|p| p.name == name).count() as u64;

    let found = catalog.find_by_name(name.clone());
    assert_eq!(found.count().await.unwrap(), count);
    for product in found.fetch_all().await.unwrap() {
        assert_eq!(product.name, name);
    }
}

pub async fn it_should_find_by_availability(catalog: &ProductCatalog) {
    let batch = create_batch(catalog, 10).await;
    let available = batch[0].available;
    let count = batch.iter().filter(|p| p.available == available).count() as u64;

    let found = catalog.find_by_availability(available);
    assert_eq!(found.count().await.unwrap(), count);
    for product in found.fetch_all().await.unwrap() {
        assert_eq!(product.available, available);
    }
}

pub async fn it_should_find_by_category(catalog: &ProductCatalog) {
    let batch = create_batch(catalog, 10).await;
    let category = batch[0].category;
    let count = batch.iter().filter(|p| p.category == category).count() as u64;

    let found = catalog.find_by_category(category);
    assert_eq!(found.count().await.unwrap(), count);
    for product in found.fetch_all().await.unwrap() {
        assert_eq!(product.category, category);
    }
}

pub async fn it_should_find_by_price(catalog: &ProductCatalog) {
    let batch = create_batch(catalog, 10).await;
    let price = batch[0].price;
    let count = batch.iter().filter(|p| p.price == price).count() as u64;

    let found = catalog.find_by_price_str(&price.to_string()).unwrap();
    assert_eq!(found.count().await.unwrap(), count);
    for product in found.fetch_all().await.unwrap() {
        assert_eq!(product.price, price);
    }
}

pub async fn it_should_refine_a_query(catalog: &ProductCatalog) {
    let batch = create_batch(catalog, 10).await;
    let category = batch[0].category;
    let count = batch
        .iter()
        .filter(|p| p.category == category && p.available)
        .count() as u64;

    let found = catalog.find_by_category(category).available(true);
    assert_eq!(found.count().await.unwrap(), count);

    let first = catalog.find_by_category(category).first().await.unwrap();
    assert_eq!(first.map(|p| p.id()), Some(batch[0].id()));
}

pub async fn it_should_round_trip_decimal_price(catalog: &ProductCatalog) {
    let mut product = Product::new(
        "Fedora",
        "A red hat",
        Decimal::new(1_234_567_890_123, 2),
        true,
        Category::Cloths,
    );
    catalog.create(&mut product).await.unwrap();

    let found = catalog.find(product.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(found.price.to_string(), "12345678901.23");
}
