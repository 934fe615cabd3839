//! Infrastructure layer - database connections, migrations and seeding.

mod db;
mod document;
pub mod migrations;
pub mod seed;

pub use db::Database;
pub use document::DocumentStore;
pub use migrations::Migrator;
pub use seed::{SeedReport, Seeder, DEMO_ADMIN_EMAIL, DEMO_SELLER_EMAIL};
