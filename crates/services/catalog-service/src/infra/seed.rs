//! Reference and demo data.
//!
//! Seeding goes through the repository contracts, so it works the same on
//! every backend. Each record is added only when missing: a reference city by
//! English name, a demo account by email, the demo store by owner. A run that
//! stopped half-way is completed by the next one, and a `Conflict` raised by a
//! concurrent seeder counts as already present.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::repository::Repositories;
use common::{AppError, AppResult, OptionExt};
use domain::{time, Address, City, Money, Offer, Password, Seller, User, UserRole};

/// (French, Arabic, English)
const REFERENCE_CITIES: &[(&str, &str, &str)] = &[
    ("Paris", "باريس", "Paris"),
    ("Lyon", "ليون", "Lyon"),
    ("Marseille", "مرسيليا", "Marseilles"),
    ("Toulouse", "تولوز", "Toulouse"),
    ("Lille", "ليل", "Lille"),
];

pub const DEMO_ADMIN_EMAIL: &str = "admin@demo.local";
pub const DEMO_SELLER_EMAIL: &str = "seller@demo.local";

/// What a seeding run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Nothing was missing
    pub skipped: bool,
    pub cities: usize,
    pub users: usize,
    pub sellers: usize,
    pub offers: usize,
}

impl SeedReport {
    fn written(&self) -> usize {
        self.cities + self.users + self.sellers + self.offers
    }
}

pub struct Seeder;

impl Seeder {
    /// Seed reference cities and, when `demo_password` is set, a demo
    /// administrator, an approved seller and one published offer.
    pub async fn run(repos: &Repositories, demo_password: Option<&str>) -> AppResult<SeedReport> {
        let mut report = SeedReport::default();
        Self::seed_cities(repos, &mut report).await?;

        if let Some(password) = demo_password {
            Self::seed_demo(repos, password, &mut report).await?;
        }

        report.skipped = report.written() == 0;
        if report.skipped {
            tracing::info!("Seed data already present");
        } else {
            tracing::info!(
                cities = report.cities,
                users = report.users,
                sellers = report.sellers,
                offers = report.offers,
                "Seed complete"
            );
        }
        Ok(report)
    }

    async fn seed_cities(repos: &Repositories, report: &mut SeedReport) -> AppResult<()> {
        let existing = repos.cities.list().await?;
        for (fr, ar, en) in REFERENCE_CITIES {
            if existing.iter().any(|c| c.name_en() == *en) {
                continue;
            }
            if added(repos.cities.add(&City::create(*fr, *ar, *en)?).await)? {
                report.cities += 1;
            }
        }
        Ok(())
    }

    async fn seed_demo(repos: &Repositories, password: &str, report: &mut SeedReport) -> AppResult<()> {
        // Hashed at most once, and only if an account is missing
        let hash = OnceCell::new();
        let admin = demo_user(repos, DEMO_ADMIN_EMAIL, UserRole::Admin, password, &hash, report).await?;
        let owner = demo_user(repos, DEMO_SELLER_EMAIL, UserRole::Seller, password, &hash, report).await?;

        let seller = match repos.sellers.get_by_user_id(owner.id()).await? {
            Some(seller) => seller,
            None => {
                let seller = demo_seller(&owner)?;
                if added(repos.sellers.add(&seller).await)? {
                    report.sellers += 1;
                    seller
                } else {
                    repos
                        .sellers
                        .get_by_user_id(owner.id())
                        .await?
                        .ok_or_not_found("Seller")?
                }
            }
        };

        if repos.offers.get_by_seller_id(seller.id()).await?.is_empty() {
            let offer = demo_offer(&seller, admin.id())?;
            if added(repos.offers.add(&offer).await)? {
                report.offers += 1;
            }
        }

        Ok(())
    }
}

/// `Ok(false)` when the record already existed.
fn added(result: AppResult<()>) -> AppResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(AppError::Conflict(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

async fn hash_password(password: &str) -> AppResult<String> {
    let plain = password.to_string();
    let hashed = tokio::task::spawn_blocking(move || Password::new(&plain))
        .await
        .map_err(|e| AppError::internal(format!("password hashing task: {e}")))??;
    Ok(hashed.into_string())
}

async fn demo_user(
    repos: &Repositories,
    email: &str,
    role: UserRole,
    password: &str,
    hash: &OnceCell<String>,
    report: &mut SeedReport,
) -> AppResult<User> {
    if let Some(user) = repos.users.get_by_email(email).await? {
        return Ok(user);
    }

    let hash = hash.get_or_try_init(|| hash_password(password)).await?;
    let user = User::create(None, email, hash.as_str(), role)?;
    if added(repos.users.add(&user).await)? {
        report.users += 1;
        return Ok(user);
    }
    repos.users.get_by_email(email).await?.ok_or_not_found("User")
}

fn demo_seller(owner: &User) -> AppResult<Seller> {
    let address = Address::with_details(
        "12 rue de la République",
        "Lyon",
        Some("69002".to_string()),
        None,
        Some(45.7640),
        Some(4.8357),
    )?;
    let mut seller = Seller::create(
        owner.id(),
        "La Boulangerie du Coin",
        address,
        "Pains et viennoiseries de la veille",
    )?;
    seller.approve();
    Ok(seller)
}

fn demo_offer(seller: &Seller, moderator_id: Uuid) -> AppResult<Offer> {
    let eur = |cents: i64| Money::new(Decimal::new(cents, 2), "EUR");
    let mut offer = Offer::create(
        seller.id(),
        "Panier anti-gaspi",
        "Assortiment de viennoiseries",
        eur(399)?,
        eur(1200)?,
        time::now() + Duration::days(1),
    )?;
    offer.set_category(Some("bakery".to_string()))?;
    offer.submit_for_validation()?;
    offer.validate(moderator_id)?;
    Ok(offer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::OfferStatus;

    #[tokio::test]
    async fn test_seeds_cities_once() {
        let repos = Repositories::in_memory();

        let first = Seeder::run(&repos, None).await.unwrap();
        assert_eq!(first.cities, REFERENCE_CITIES.len());
        assert_eq!(first.users, 0);

        let second = Seeder::run(&repos, None).await.unwrap();
        assert!(second.skipped);
        assert_eq!(repos.cities.list().await.unwrap().len(), REFERENCE_CITIES.len());
    }

    #[tokio::test]
    async fn test_demo_added_after_cities() {
        let repos = Repositories::in_memory();
        Seeder::run(&repos, None).await.unwrap();

        let report = Seeder::run(&repos, Some("demo-password")).await.unwrap();
        assert!(!report.skipped);
        assert_eq!(report.cities, 0);
        assert_eq!((report.users, report.sellers, report.offers), (2, 1, 1));

        let again = Seeder::run(&repos, Some("demo-password")).await.unwrap();
        assert!(again.skipped);
    }

    #[tokio::test]
    async fn test_failed_demo_seed_is_completed_later() {
        let repos = Repositories::in_memory();

        let err = Seeder::run(&repos, Some("short")).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(_)));
        assert!(repos.users.get_by_email(DEMO_ADMIN_EMAIL).await.unwrap().is_none());

        let report = Seeder::run(&repos, Some("demo-password")).await.unwrap();
        assert_eq!(report.cities, 0);
        assert_eq!(report.users, 2);
        assert_eq!(report.offers, 1);
    }

    #[tokio::test]
    async fn test_concurrent_seeders_write_each_city_once() {
        let repos = Repositories::in_memory();

        let (first, second) = tokio::join!(Seeder::run(&repos, None), Seeder::run(&repos, None));
        let written = first.unwrap().cities + second.unwrap().cities;

        assert_eq!(written, REFERENCE_CITIES.len());
        assert_eq!(repos.cities.list().await.unwrap().len(), REFERENCE_CITIES.len());
    }

    #[tokio::test]
    async fn test_demo_data_is_published() {
        let repos = Repositories::in_memory();

        let report = Seeder::run(&repos, Some("demo-password")).await.unwrap();
        assert_eq!(report.users, 2);

        let owner = repos
            .users
            .get_by_email(DEMO_SELLER_EMAIL)
            .await
            .unwrap()
            .unwrap();
        let seller = repos.sellers.get_by_user_id(owner.id()).await.unwrap().unwrap();
        assert!(seller.is_approved());

        let offers = repos.offers.get_by_seller_id(seller.id()).await.unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].status(), OfferStatus::Published);
        assert!(offers[0].is_active_at(time::now()));
        assert!(Password::from_hash(owner.password_hash()).verify("demo-password"));
    }
}
