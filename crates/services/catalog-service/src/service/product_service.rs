//! Product service - a seller's regular catalogue.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::cancel::cancellable;
use super::requests::{
    validate_request, ChangeProductPriceRequest, CreateProductRequest, UpdateProductDetailsRequest,
};
use crate::repository::{ProductRepository, SellerRepository};
use common::{AppResult, OptionExt};
use domain::{Money, Product};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn create_product(
        &self,
        request: CreateProductRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Product>;

    async fn update_product_details(
        &self,
        product_id: Uuid,
        request: UpdateProductDetailsRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Product>;

    async fn change_product_price(
        &self,
        product_id: Uuid,
        request: ChangeProductPriceRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Product>;

    /// Take a product off the shelf or put it back.
    async fn set_product_availability(
        &self,
        product_id: Uuid,
        available: bool,
        cancel: &CancellationToken,
    ) -> AppResult<Product>;

    /// Products of a seller, by name. Unknown sellers yield an empty list.
    async fn get_seller_products(
        &self,
        seller_id: Uuid,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<Product>>;
}

pub struct ProductManager {
    sellers: Arc<dyn SellerRepository>,
    products: Arc<dyn ProductRepository>,
}

impl ProductManager {
    pub fn new(sellers: Arc<dyn SellerRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { sellers, products }
    }

    async fn create(&self, request: CreateProductRequest) -> AppResult<Product> {
        let seller = self
            .sellers
            .get_by_id(request.seller_id)
            .await?
            .ok_or_not_found("Seller")?;

        let price = Money::new(request.price, request.currency)?;
        let product = Product::create(
            seller.id(),
            request.name,
            request.description,
            price,
            request.category,
        )?;

        self.products.add(&product).await?;
        tracing::info!(product_id = %product.id(), seller_id = %seller.id(), "Product created");
        Ok(product)
    }

    /// Load, apply `change`, persist.
    async fn modify<F>(&self, product_id: Uuid, change: F) -> AppResult<Product>
    where
        F: FnOnce(&mut Product) -> AppResult<()> + Send,
    {
        let mut product = self
            .products
            .get_by_id(product_id)
            .await?
            .ok_or_not_found("Product")?;
        change(&mut product)?;
        self.products.update(&product).await?;
        Ok(product)
    }
}

#[async_trait]
impl ProductService for ProductManager {
    async fn create_product(
        &self,
        request: CreateProductRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Product> {
        validate_request(&request)?;
        cancellable(cancel, self.create(request)).await
    }

    async fn update_product_details(
        &self,
        product_id: Uuid,
        request: UpdateProductDetailsRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Product> {
        validate_request(&request)?;
        cancellable(
            cancel,
            self.modify(product_id, move |product| {
                Ok(product.update_details(request.name, request.description)?)
            }),
        )
        .await
    }

    async fn change_product_price(
        &self,
        product_id: Uuid,
        request: ChangeProductPriceRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Product> {
        validate_request(&request)?;
        let price = Money::new(request.price, request.currency)?;
        cancellable(
            cancel,
            self.modify(product_id, move |product| {
                product.change_price(price);
                Ok(())
            }),
        )
        .await
    }

    async fn set_product_availability(
        &self,
        product_id: Uuid,
        available: bool,
        cancel: &CancellationToken,
    ) -> AppResult<Product> {
        cancellable(
            cancel,
            self.modify(product_id, move |product| {
                if available {
                    product.mark_available();
                } else {
                    product.mark_unavailable();
                }
                Ok(())
            }),
        )
        .await
    }

    async fn get_seller_products(
        &self,
        seller_id: Uuid,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<Product>> {
        cancellable(cancel, self.products.get_by_seller_id(seller_id)).await
    }
}
