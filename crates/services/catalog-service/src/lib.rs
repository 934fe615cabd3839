//! Catalog Service Library
//!
//! Consistency core of the surplus-food marketplace: sellers, offers and
//! their moderation, products and reference cities, behind one set of
//! repository contracts with in-memory, PostgreSQL and MongoDB backends.

pub mod config;
pub mod infra;
pub mod repository;
pub mod security;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::config::CatalogServiceConfig;
use crate::infra::{Database, DocumentStore, SeedReport, Seeder};
use crate::repository::Repositories;
use crate::security::{Argon2Verifier, JwtIssuer};
use crate::service::Services;
use common::{AppResult, StorageBackend};

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run migrations against the relational backend (for CLI commands).
///
/// Returns `(migration, applied)` pairs for `Status`, nothing otherwise.
pub async fn run_migrations(
    config: &CatalogServiceConfig,
    action: MigrateAction,
) -> AppResult<Vec<(String, bool)>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => return Ok(db.migration_status().await?),
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(Vec::new())
}

/// Connect to the configured backend and build its repositories.
pub async fn build_repositories(config: &CatalogServiceConfig) -> AppResult<Repositories> {
    let repos = match config.storage {
        StorageBackend::Memory => Repositories::in_memory(),
        StorageBackend::Relational => {
            let db = Database::connect(&config.database).await?;
            Repositories::relational(db.get_connection())
        }
        StorageBackend::Document => {
            let store = DocumentStore::connect(&config.document).await?;
            Repositories::document(store.database())
        }
    };
    info!(backend = %config.storage, "Repositories ready");
    Ok(repos)
}

/// Seed reference data, plus demo accounts when a demo password is configured.
pub async fn seed(config: &CatalogServiceConfig, repos: &Repositories) -> AppResult<SeedReport> {
    Seeder::run(repos, config.seed_demo_password.as_deref()).await
}

/// Boot sequence: connect to the configured backend, then seed whatever
/// reference (and demo) data it is missing.
pub async fn boot(config: &CatalogServiceConfig) -> AppResult<(Repositories, SeedReport)> {
    let repos = build_repositories(config).await?;
    let report = seed(config, &repos).await?;
    Ok((repos, report))
}

/// Wire the use-case handlers over `repos` with the production security stack.
pub fn build_services(config: &CatalogServiceConfig, repos: &Repositories) -> Services {
    Services::new(
        repos,
        Arc::new(JwtIssuer::new(&config.jwt)),
        Arc::new(Argon2Verifier),
    )
}
