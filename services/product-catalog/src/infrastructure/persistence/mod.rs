//! Persistence implementations

mod memory;
mod migrations;
mod postgres;
mod rows;

pub use memory::InMemoryProductRepository;
pub use migrations::{drop_db, init_db, product_migrations, schema_version};
pub use postgres::PostgresProductRepository;
