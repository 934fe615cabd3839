//! Address value object.

use serde::Serialize;

use crate::constants::DEFAULT_COUNTRY;
use crate::error::{require_text, DomainResult};

/// Postal address of a seller's store.
///
/// Immutable once built; street and city are mandatory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Address {
    street: String,
    city: String,
    zip_code: Option<String>,
    country: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl Address {
    /// Build an address in the default country.
    pub fn new(street: impl Into<String>, city: impl Into<String>) -> DomainResult<Self> {
        Self::with_details(street, city, None, None, None, None)
    }

    /// Build an address with every optional part.
    ///
    /// `country` falls back to [`DEFAULT_COUNTRY`] when absent or blank.
    pub fn with_details(
        street: impl Into<String>,
        city: impl Into<String>,
        zip_code: Option<String>,
        country: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> DomainResult<Self> {
        let street = street.into();
        let city = city.into();
        require_text("street", &street)?;
        require_text("city", &city)?;

        let country = country
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

        Ok(Self {
            street,
            city,
            zip_code,
            country,
            latitude,
            longitude,
        })
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn zip_code(&self) -> Option<&str> {
        self.zip_code.as_deref()
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }
}
