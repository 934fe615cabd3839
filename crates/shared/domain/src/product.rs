//! Product entity - the regular catalogue of a seller.

use serde::Serialize;
use uuid::Uuid;

use crate::error::{require_text, DomainResult};
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    id: Uuid,
    seller_id: Uuid,
    name: String,
    description: String,
    price: Money,
    category: Option<String>,
    is_available: bool,
}

/// Stored state of a product, used by storage backends to rebuild one.
#[derive(Debug, Clone)]
pub struct ProductParts {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub category: Option<String>,
    pub is_available: bool,
}

impl Product {
    /// Create an available product.
    pub fn create(
        seller_id: Uuid,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        category: Option<String>,
    ) -> DomainResult<Self> {
        Self::restore(ProductParts {
            id: Uuid::new_v4(),
            seller_id,
            name: name.into(),
            description: description.into(),
            price,
            category,
            is_available: true,
        })
    }

    pub fn restore(parts: ProductParts) -> DomainResult<Self> {
        require_text("product name", &parts.name)?;
        Ok(Self {
            id: parts.id,
            seller_id: parts.seller_id,
            name: parts.name,
            description: parts.description,
            price: parts.price,
            category: parts.category,
            is_available: parts.is_available,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn seller_id(&self) -> Uuid {
        self.seller_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> &Money {
        &self.price
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> DomainResult<()> {
        let name = name.into();
        require_text("product name", &name)?;
        self.name = name;
        self.description = description.into();
        Ok(())
    }

    pub fn change_price(&mut self, price: Money) {
        self.price = price;
    }

    pub fn mark_available(&mut self) {
        self.is_available = true;
    }

    pub fn mark_unavailable(&mut self) {
        self.is_available = false;
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_product_lifecycle() {
        let price = Money::new(Decimal::new(350, 2), "EUR").unwrap();
        let mut product =
            Product::create(Uuid::new_v4(), "Baguette", "Tradition", price, Some("bakery".into()))
                .unwrap();
        assert!(product.is_available());

        product.mark_unavailable();
        assert!(!product.is_available());
        product.mark_available();
        assert!(product.is_available());

        product.change_price(Money::new(Decimal::new(300, 2), "EUR").unwrap());
        assert_eq!(product.price().amount(), Decimal::new(3, 0));

        assert!(product.update_details("", "x").is_err());
        product.update_details("Pain de campagne", "Levain").unwrap();
        assert_eq!(product.name(), "Pain de campagne");
    }
}
