//! Money value object.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{require_text, DomainError, DomainResult};

/// Non-negative amount in a named currency.
///
/// Construction is the only validation point. Equality is structural:
/// two instances are equal when both amount and currency are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    /// Build a money value.
    ///
    /// # Errors
    /// Returns a validation error if `amount` is negative or `currency` is empty.
    pub fn new(amount: Decimal, currency: impl Into<String>) -> DomainResult<Self> {
        let currency = currency.into();
        if amount < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "Money amount must be non-negative, got {}",
                amount
            )));
        }
        require_text("currency", &currency)?;
        Ok(Self { amount, currency })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Strict numeric comparison; fails when currencies differ.
    pub fn is_greater_than(&self, other: &Money) -> DomainResult<bool> {
        self.ensure_same_currency(other)?;
        Ok(self.amount > other.amount)
    }

    /// Strict numeric comparison; fails when currencies differ.
    pub fn is_less_than(&self, other: &Money) -> DomainResult<bool> {
        self.ensure_same_currency(other)?;
        Ok(self.amount < other.amount)
    }

    fn ensure_same_currency(&self, other: &Money) -> DomainResult<()> {
        if self.currency != other.currency {
            return Err(DomainError::currency_mismatch(&self.currency, &other.currency));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur(amount: i64) -> Money {
        Money::new(Decimal::from(amount), "EUR").unwrap()
    }

    #[test]
    fn test_negative_amount_rejected() {
        for amount in [-1_i64, -50, -10_000] {
            let result = Money::new(Decimal::from(amount), "EUR");
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }
        let fraction = Money::new(Decimal::new(-1, 2), "EUR");
        assert!(matches!(fraction, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_non_negative_amount_round_trips() {
        for amount in [Decimal::ZERO, Decimal::new(4999, 2), Decimal::from(100)] {
            let money = Money::new(amount, "EUR").unwrap();
            assert_eq!(money.amount(), amount);
            assert_eq!(money.currency(), "EUR");
        }
    }

    #[test]
    fn test_empty_currency_rejected() {
        assert!(Money::new(Decimal::ONE, " ").is_err());
    }

    #[test]
    fn test_comparisons() {
        assert!(eur(50).is_less_than(&eur(100)).unwrap());
        assert!(!eur(100).is_less_than(&eur(100)).unwrap());
        assert!(eur(100).is_greater_than(&eur(50)).unwrap());
        assert!(!eur(50).is_greater_than(&eur(50)).unwrap());
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = Money::new(Decimal::from(10), "USD").unwrap();
        assert!(matches!(
            eur(5).is_less_than(&usd),
            Err(DomainError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            eur(5).is_greater_than(&usd),
            Err(DomainError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(eur(10), eur(10));
        assert_ne!(eur(10), Money::new(Decimal::from(10), "USD").unwrap());
    }
}
