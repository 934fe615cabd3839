//! Request and response values of the use-case handlers.
//!
//! Requests derive `Validate` for shape checks only; business rules stay in
//! the domain entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult};
use domain::UserResponse;

/// Run request-shape validation, reporting failures as `BadRequest`.
pub fn validate_request<R: Validate>(request: &R) -> AppResult<()> {
    request
        .validate()
        .map_err(|e| AppError::bad_request(e.to_string()))
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Successful login: bearer token plus the caller's identity.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CityQuery {
    /// Keep only cities with at least one currently active offer.
    #[serde(default)]
    pub with_active_offers: bool,
    /// Keep only cities where a seller located in this country operates.
    #[validate(length(min = 1, message = "Country must not be empty"))]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterSellerRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 120, message = "Store name must be 1-120 characters"))]
    pub store_name: String,
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOfferRequest {
    pub seller_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub original_price: Decimal,
    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub currency: String,
    pub expiration_date: DateTime<Utc>,
    /// Defaults to now.
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    #[validate(url(message = "Picture URL is not a valid URL"))]
    pub picture_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOfferDetailsRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeOfferPriceRequest {
    pub price: Decimal,
    pub original_price: Decimal,
    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub currency: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct OfferSearch {
    /// City name in any of its localized forms.
    pub city: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductRequest {
    pub seller_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub currency: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProductDetailsRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeProductPriceRequest {
    pub price: Decimal,
    #[validate(length(equal = 3, message = "Currency must be an ISO 4217 code"))]
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_email_is_bad_request() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        let err = validate_request(&request).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_blank_country_rejected() {
        let query = CityQuery {
            with_active_offers: true,
            country: Some(String::new()),
        };
        assert!(validate_request(&query).is_err());
        assert!(validate_request(&CityQuery::default()).is_ok());
    }
}
