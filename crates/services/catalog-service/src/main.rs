//! Catalog Service - command-line entry point.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use catalog_service_lib::config::CatalogServiceConfig;
use catalog_service_lib::repository::Repositories;
use catalog_service_lib::service::{
    CityQuery, CityService, OfferService, ProductService, ServiceContainer,
};
use catalog_service_lib::MigrateAction;
use common::AppResult;

#[derive(Parser)]
#[command(name = "catalog-service")]
#[command(about = "Surplus-food catalog consistency core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands (relational backend)
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Seed missing reference cities and, with SEED_DEMO_PASSWORD, demo accounts
    Seed,
    /// List cities
    Cities {
        /// Only cities with at least one active offer
        #[arg(long)]
        with_offers: bool,
        /// Only cities where a seller located in this country operates
        #[arg(long)]
        country: Option<String>,
    },
    /// List the offers of a seller
    Offers {
        #[arg(long)]
        seller: Uuid,
    },
    /// List the products of a seller
    Products {
        #[arg(long)]
        seller: Uuid,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command).await {
        tracing::error!(code = e.code(), "Command failed: {}", e.user_message());
        // EX_TEMPFAIL lets wrappers retry when storage was unreachable
        std::process::exit(if e.is_unavailable() { 75 } else { 1 });
    }
}

async fn run(command: Commands) -> AppResult<()> {
    let config = CatalogServiceConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let command = match command {
        Commands::Migrate { action } => return migrate(&config, action).await,
        other => other,
    };

    let (repos, report) = catalog_service_lib::boot(&config).await?;
    if let Commands::Seed = command {
        return print_json(&report);
    }
    query(&config, &repos, command).await
}

async fn migrate(config: &CatalogServiceConfig, action: MigrateCommands) -> AppResult<()> {
    let action = match action {
        MigrateCommands::Up => MigrateAction::Up,
        MigrateCommands::Down => MigrateAction::Down,
        MigrateCommands::Status => MigrateAction::Status,
        MigrateCommands::Fresh => MigrateAction::Fresh,
    };
    for (name, applied) in catalog_service_lib::run_migrations(config, action).await? {
        let marker = if applied { "[x]" } else { "[ ]" };
        println!("{} {}", marker, name);
    }
    Ok(())
}

async fn query(
    config: &CatalogServiceConfig,
    repos: &Repositories,
    command: Commands,
) -> AppResult<()> {
    let services = catalog_service_lib::build_services(config, repos);
    let cancel = CancellationToken::new();

    // Ctrl-C abandons the running query
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    match command {
        Commands::Cities {
            with_offers,
            country,
        } => {
            let query = CityQuery {
                with_active_offers: with_offers,
                country,
            };
            let cities = services.cities().list_cities(query, &cancel).await?;
            print_lines(&cities)
        }
        Commands::Offers { seller } => {
            let offers = services.offers().get_seller_offers(seller, &cancel).await?;
            print_lines(&offers)
        }
        Commands::Products { seller } => {
            let products = services
                .products()
                .get_seller_products(seller, &cancel)
                .await?;
            print_lines(&products)
        }
        Commands::Migrate { .. } | Commands::Seed => Ok(()),
    }
}

fn print_lines<T: Serialize>(items: &[T]) -> AppResult<()> {
    items.iter().try_for_each(print_json)
}

fn print_json<T: Serialize>(item: &T) -> AppResult<()> {
    let line = serde_json::to_string(item)
        .map_err(|e| common::AppError::internal(format!("serialization: {e}")))?;
    println!("{}", line);
    Ok(())
}

/// Initialize tracing subscriber (verbose mode sets debug level)
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
