//! Seller service - registration and the approval workflow.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::cancel::cancellable;
use super::require_admin;
use super::requests::{validate_request, RegisterSellerRequest};
use crate::repository::{SellerRepository, UserRepository};
use common::{AppError, AppResult, OptionExt};
use domain::{Address, Seller};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SellerService: Send + Sync {
    /// Create a PENDING seller profile for an existing user.
    async fn register_seller(
        &self,
        request: RegisterSellerRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Seller>;

    async fn get_seller(&self, seller_id: Uuid, cancel: &CancellationToken) -> AppResult<Seller>;

    /// Approve a seller. Requires an administrator.
    async fn approve_seller(
        &self,
        moderator_id: Uuid,
        seller_id: Uuid,
        cancel: &CancellationToken,
    ) -> AppResult<Seller>;

    /// Reject a seller with a reason. Requires an administrator.
    async fn reject_seller(
        &self,
        moderator_id: Uuid,
        seller_id: Uuid,
        reason: String,
        cancel: &CancellationToken,
    ) -> AppResult<Seller>;
}

pub struct SellerManager {
    users: Arc<dyn UserRepository>,
    sellers: Arc<dyn SellerRepository>,
}

impl SellerManager {
    pub fn new(users: Arc<dyn UserRepository>, sellers: Arc<dyn SellerRepository>) -> Self {
        Self { users, sellers }
    }

    async fn register(&self, request: RegisterSellerRequest) -> AppResult<Seller> {
        self.users
            .get_by_id(request.user_id)
            .await?
            .ok_or_not_found("User")?;

        if self.sellers.get_by_user_id(request.user_id).await?.is_some() {
            return Err(AppError::conflict("Seller"));
        }

        let address = Address::with_details(
            request.street,
            request.city,
            request.zip_code,
            request.country,
            request.latitude,
            request.longitude,
        )?;
        let seller = Seller::create(
            request.user_id,
            request.store_name,
            address,
            request.description,
        )?;

        self.sellers.add(&seller).await?;
        tracing::info!(seller_id = %seller.id(), user_id = %seller.user_id(), "Seller registered");
        Ok(seller)
    }

    async fn load(&self, seller_id: Uuid) -> AppResult<Seller> {
        self.sellers
            .get_by_id(seller_id)
            .await?
            .ok_or_not_found("Seller")
    }

    async fn approve(&self, moderator_id: Uuid, seller_id: Uuid) -> AppResult<Seller> {
        require_admin(self.users.as_ref(), moderator_id).await?;
        let mut seller = self.load(seller_id).await?;

        seller.approve();
        self.sellers.update(&seller).await?;
        tracing::info!(%seller_id, %moderator_id, "Seller approved");
        Ok(seller)
    }

    async fn reject(&self, moderator_id: Uuid, seller_id: Uuid, reason: String) -> AppResult<Seller> {
        require_admin(self.users.as_ref(), moderator_id).await?;
        let mut seller = self.load(seller_id).await?;

        seller.reject(reason)?;
        self.sellers.update(&seller).await?;
        tracing::info!(%seller_id, %moderator_id, "Seller rejected");
        Ok(seller)
    }
}

#[async_trait]
impl SellerService for SellerManager {
    async fn register_seller(
        &self,
        request: RegisterSellerRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Seller> {
        validate_request(&request)?;
        cancellable(cancel, self.register(request)).await
    }

    async fn get_seller(&self, seller_id: Uuid, cancel: &CancellationToken) -> AppResult<Seller> {
        cancellable(cancel, self.load(seller_id)).await
    }

    async fn approve_seller(
        &self,
        moderator_id: Uuid,
        seller_id: Uuid,
        cancel: &CancellationToken,
    ) -> AppResult<Seller> {
        cancellable(cancel, self.approve(moderator_id, seller_id)).await
    }

    async fn reject_seller(
        &self,
        moderator_id: Uuid,
        seller_id: Uuid,
        reason: String,
        cancel: &CancellationToken,
    ) -> AppResult<Seller> {
        cancellable(cancel, self.reject(moderator_id, seller_id, reason)).await
    }
}
