//! Offer aggregate and its moderation workflow.
//!
//! ```text
//! DRAFT --submit--> PENDING_VALIDATION --validate--> PUBLISHED
//!                                     \--reject----> REJECTED
//! ```
//!
//! Content and price edits are only accepted in `DRAFT`. Every transition
//! appends one [`StatusChange`] to the offer's history.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::constants::{
    OFFER_STATUS_DRAFT, OFFER_STATUS_PENDING_VALIDATION, OFFER_STATUS_PUBLISHED,
    OFFER_STATUS_REJECTED,
};
use crate::error::{require_text, DomainError, DomainResult};
use crate::money::Money;
use crate::time;

/// Moderation status of an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Draft,
    PendingValidation,
    Published,
    Rejected,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Draft => OFFER_STATUS_DRAFT,
            OfferStatus::PendingValidation => OFFER_STATUS_PENDING_VALIDATION,
            OfferStatus::Published => OFFER_STATUS_PUBLISHED,
            OfferStatus::Rejected => OFFER_STATUS_REJECTED,
        }
    }
}

impl FromStr for OfferStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            OFFER_STATUS_DRAFT => Ok(OfferStatus::Draft),
            OFFER_STATUS_PENDING_VALIDATION => Ok(OfferStatus::PendingValidation),
            OFFER_STATUS_PUBLISHED => Ok(OfferStatus::Published),
            OFFER_STATUS_REJECTED => Ok(OfferStatus::Rejected),
            other => Err(DomainError::validation(format!(
                "Unknown offer status: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an offer's status history. Never modified once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub status: OfferStatus,
    pub changed_by: Option<Uuid>,
    pub changed_at: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Discounted surplus-food offer published by a seller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    id: Uuid,
    seller_id: Uuid,
    title: String,
    description: String,
    category: Option<String>,
    price: Money,
    original_price: Money,
    picture_url: Option<String>,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    expiration_date: DateTime<Utc>,
    status: OfferStatus,
    status_history: Vec<StatusChange>,
}

/// Stored state of an offer, used by storage backends to rebuild one.
#[derive(Debug, Clone)]
pub struct OfferParts {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub price: Money,
    pub original_price: Money,
    pub picture_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub expiration_date: DateTime<Utc>,
    pub status: OfferStatus,
    pub status_history: Vec<StatusChange>,
}

const ENTITY: &str = "offer";

impl Offer {
    /// Create a draft offer starting now.
    ///
    /// # Errors
    /// [`DomainError::InvalidPrice`] unless `price < original_price`,
    /// [`DomainError::CurrencyMismatch`] if the two prices use different currencies.
    pub fn create(
        seller_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        original_price: Money,
        expiration_date: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::restore(OfferParts {
            id: Uuid::new_v4(),
            seller_id,
            title: title.into(),
            description: description.into(),
            category: None,
            price,
            original_price,
            picture_url: None,
            start_date: time::now(),
            end_date: None,
            expiration_date,
            status: OfferStatus::Draft,
            status_history: Vec::new(),
        })
    }

    /// Rebuild an offer from stored state, re-checking its invariants.
    pub fn restore(parts: OfferParts) -> DomainResult<Self> {
        require_text("title", &parts.title)?;
        ensure_discounted(&parts.price, &parts.original_price)?;
        let (start_date, end_date) = normalized_window(parts.start_date, parts.end_date)?;

        Ok(Self {
            id: parts.id,
            seller_id: parts.seller_id,
            title: parts.title,
            description: parts.description,
            category: parts.category,
            price: parts.price,
            original_price: parts.original_price,
            picture_url: parts.picture_url,
            start_date,
            end_date,
            expiration_date: time::normalize(parts.expiration_date),
            status: parts.status,
            status_history: parts.status_history,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn seller_id(&self) -> Uuid {
        self.seller_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn price(&self) -> &Money {
        &self.price
    }

    pub fn original_price(&self) -> &Money {
        &self.original_price
    }

    pub fn picture_url(&self) -> Option<&str> {
        self.picture_url.as_deref()
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn expiration_date(&self) -> DateTime<Utc> {
        self.expiration_date
    }

    pub fn status(&self) -> OfferStatus {
        self.status
    }

    /// Status history in insertion order.
    pub fn status_history(&self) -> &[StatusChange] {
        &self.status_history
    }

    /// Published and inside `start_date <= now < end_date` (open-ended without an end).
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == OfferStatus::Published
            && self.start_date <= now
            && self.end_date.map_or(true, |end| now < end)
    }

    // =========================================================================
    // Draft edits
    // =========================================================================

    /// Replace title and description.
    pub fn update_details(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> DomainResult<()> {
        self.ensure_draft("update details of")?;
        let title = title.into();
        require_text("title", &title)?;
        self.title = title;
        self.description = description.into();
        Ok(())
    }

    /// Replace both prices; the discount invariant is checked again.
    pub fn change_price(&mut self, price: Money, original_price: Money) -> DomainResult<()> {
        self.ensure_draft("change price of")?;
        ensure_discounted(&price, &original_price)?;
        self.price = price;
        self.original_price = original_price;
        Ok(())
    }

    /// Set the active window.
    pub fn schedule(
        &mut self,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> DomainResult<()> {
        self.ensure_draft("schedule")?;
        let (start_date, end_date) = normalized_window(start_date, end_date)?;
        self.start_date = start_date;
        self.end_date = end_date;
        Ok(())
    }

    pub fn set_picture_url(&mut self, picture_url: Option<String>) -> DomainResult<()> {
        self.ensure_draft("change picture of")?;
        self.picture_url = picture_url;
        Ok(())
    }

    pub fn set_category(&mut self, category: Option<String>) -> DomainResult<()> {
        self.ensure_draft("change category of")?;
        self.category = category;
        Ok(())
    }

    // =========================================================================
    // Moderation workflow
    // =========================================================================

    /// DRAFT -> PENDING_VALIDATION
    pub fn submit_for_validation(&mut self) -> DomainResult<()> {
        self.ensure_draft("submit")?;
        self.transition(OfferStatus::PendingValidation, None, None);
        Ok(())
    }

    /// PENDING_VALIDATION -> PUBLISHED, recording the moderator.
    pub fn validate(&mut self, moderator_id: Uuid) -> DomainResult<()> {
        self.ensure_pending("validate")?;
        self.transition(OfferStatus::Published, Some(moderator_id), None);
        Ok(())
    }

    /// PENDING_VALIDATION -> REJECTED, recording the moderator and reason.
    pub fn reject_offer(&mut self, moderator_id: Uuid, reason: impl Into<String>) -> DomainResult<()> {
        self.ensure_pending("reject")?;
        let reason = reason.into();
        require_text("rejection reason", &reason)?;
        self.transition(OfferStatus::Rejected, Some(moderator_id), Some(reason));
        Ok(())
    }

    fn transition(&mut self, status: OfferStatus, changed_by: Option<Uuid>, reason: Option<String>) {
        self.status = status;
        self.status_history.push(StatusChange {
            status,
            changed_by,
            changed_at: time::now(),
            reason,
        });
    }

    fn ensure_draft(&self, action: &str) -> DomainResult<()> {
        if self.status != OfferStatus::Draft {
            return Err(DomainError::transition(ENTITY, action, self.status));
        }
        Ok(())
    }

    fn ensure_pending(&self, action: &str) -> DomainResult<()> {
        if self.status != OfferStatus::PendingValidation {
            return Err(DomainError::transition(ENTITY, action, self.status));
        }
        Ok(())
    }
}

fn ensure_discounted(price: &Money, original_price: &Money) -> DomainResult<()> {
    if price.is_less_than(original_price)? {
        Ok(())
    } else {
        Err(DomainError::invalid_price(format!(
            "price {} must be lower than original price {}",
            price, original_price
        )))
    }
}

/// Truncate both ends to storage precision, then require `end > start`.
fn normalized_window(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> DomainResult<(DateTime<Utc>, Option<DateTime<Utc>>)> {
    let start = time::normalize(start);
    let end = end.map(time::normalize);
    match end {
        Some(end) if end <= start => Err(DomainError::validation(
            "end date must be after start date",
        )),
        _ => Ok((start, end)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal::Decimal;

    use super::*;

    fn eur(amount: i64) -> Money {
        Money::new(Decimal::from(amount), "EUR").unwrap()
    }

    fn draft() -> Offer {
        Offer::create(
            Uuid::new_v4(),
            "Super Promo",
            "Desc",
            eur(50),
            eur(100),
            Utc::now() + Duration::days(2),
        )
        .unwrap()
    }

    fn in_state(status: OfferStatus) -> Offer {
        let mut offer = draft();
        match status {
            OfferStatus::Draft => {}
            OfferStatus::PendingValidation => offer.submit_for_validation().unwrap(),
            OfferStatus::Published => {
                offer.submit_for_validation().unwrap();
                offer.validate(Uuid::new_v4()).unwrap();
            }
            OfferStatus::Rejected => {
                offer.submit_for_validation().unwrap();
                offer.reject_offer(Uuid::new_v4(), "blurry picture").unwrap();
            }
        }
        offer
    }

    const ALL: [OfferStatus; 4] = [
        OfferStatus::Draft,
        OfferStatus::PendingValidation,
        OfferStatus::Published,
        OfferStatus::Rejected,
    ];

    #[test]
    fn test_create_is_draft_without_history() {
        let offer = draft();
        assert_eq!(offer.status(), OfferStatus::Draft);
        assert!(offer.status_history().is_empty());
    }

    #[test]
    fn test_price_must_be_below_original() {
        for (price, original) in [(150, 100), (100, 100)] {
            let result = Offer::create(
                Uuid::new_v4(),
                "Promo",
                "Desc",
                eur(price),
                eur(original),
                Utc::now(),
            );
            assert!(matches!(result, Err(DomainError::InvalidPrice(_))));
        }
    }

    #[test]
    fn test_price_currency_mismatch() {
        let usd = Money::new(Decimal::from(100), "USD").unwrap();
        let result = Offer::create(Uuid::new_v4(), "Promo", "Desc", eur(50), usd, Utc::now());
        assert!(matches!(result, Err(DomainError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_moderation_scenario() {
        let mut offer = draft();
        offer.submit_for_validation().unwrap();
        assert_eq!(offer.status(), OfferStatus::PendingValidation);

        let err = offer.update_details("New title", "New desc").unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
        assert_eq!(offer.title(), "Super Promo");

        let admin = Uuid::new_v4();
        offer.validate(admin).unwrap();
        assert_eq!(offer.status(), OfferStatus::Published);

        let history = offer.status_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status, OfferStatus::PendingValidation);
        assert_eq!(history[1].status, OfferStatus::Published);
        assert_eq!(history[1].changed_by, Some(admin));
    }

    #[test]
    fn test_rejection_records_reason() {
        let offer = in_state(OfferStatus::Rejected);
        let last = offer.status_history().last().unwrap();
        assert_eq!(last.status, OfferStatus::Rejected);
        assert_eq!(last.reason.as_deref(), Some("blurry picture"));
    }

    #[test]
    fn test_reject_requires_reason() {
        let mut offer = in_state(OfferStatus::PendingValidation);
        assert!(matches!(
            offer.reject_offer(Uuid::new_v4(), ""),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(offer.status(), OfferStatus::PendingValidation);
        assert_eq!(offer.status_history().len(), 1);
    }

    #[test]
    fn test_state_machine_is_total() {
        // Every (state, event) pair either reaches the documented state or fails
        // with InvalidStateTransition, leaving the offer untouched.
        for from in ALL {
            let events: [(&str, Option<OfferStatus>); 4] = [
                ("submit", (from == OfferStatus::Draft).then_some(OfferStatus::PendingValidation)),
                ("validate", (from == OfferStatus::PendingValidation).then_some(OfferStatus::Published)),
                ("reject", (from == OfferStatus::PendingValidation).then_some(OfferStatus::Rejected)),
                ("update", (from == OfferStatus::Draft).then_some(OfferStatus::Draft)),
            ];

            for (event, expected) in events {
                let mut offer = in_state(from);
                let before = offer.clone();
                let result = match event {
                    "submit" => offer.submit_for_validation(),
                    "validate" => offer.validate(Uuid::new_v4()),
                    "reject" => offer.reject_offer(Uuid::new_v4(), "reason"),
                    _ => offer.update_details("Other", "Other desc"),
                };

                match expected {
                    Some(next) => {
                        assert!(result.is_ok(), "{} from {} should succeed", event, from);
                        assert_eq!(offer.status(), next);
                    }
                    None => {
                        assert!(
                            matches!(result, Err(DomainError::InvalidStateTransition(_))),
                            "{} from {} should fail",
                            event,
                            from
                        );
                        assert_eq!(offer, before);
                    }
                }
            }
        }
    }

    #[test]
    fn test_history_is_append_only() {
        let offer = in_state(OfferStatus::Published);
        let history = offer.status_history();
        assert!(history[0].changed_at <= history[1].changed_at);
        assert_eq!(history[0].changed_by, None);
    }

    #[test]
    fn test_change_price_revalidates() {
        let mut offer = draft();
        assert!(matches!(
            offer.change_price(eur(120), eur(100)),
            Err(DomainError::InvalidPrice(_))
        ));
        assert_eq!(offer.price(), &eur(50));

        offer.change_price(eur(30), eur(90)).unwrap();
        assert_eq!(offer.price(), &eur(30));
        assert_eq!(offer.original_price(), &eur(90));

        offer.submit_for_validation().unwrap();
        assert!(matches!(
            offer.change_price(eur(10), eur(90)),
            Err(DomainError::InvalidStateTransition(_))
        ));
    }

    #[test]
    fn test_active_window() {
        let now = time::now();
        let mut offer = draft();
        offer
            .schedule(now - Duration::hours(1), Some(now + Duration::hours(1)))
            .unwrap();
        assert!(!offer.is_active_at(now), "drafts are never active");

        offer.submit_for_validation().unwrap();
        offer.validate(Uuid::new_v4()).unwrap();
        assert!(offer.is_active_at(now));
        assert!(!offer.is_active_at(now + Duration::hours(1)));
        assert!(!offer.is_active_at(now - Duration::hours(2)));
    }

    #[test]
    fn test_open_ended_window() {
        let offer = in_state(OfferStatus::Published);
        assert!(offer.is_active_at(offer.start_date()));
        assert!(offer.is_active_at(offer.start_date() + Duration::days(365)));
    }

    #[test]
    fn test_schedule_rejects_inverted_window() {
        let now = time::now();
        let mut offer = draft();
        assert!(matches!(
            offer.schedule(now, Some(now)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_schedule_rejects_window_inside_one_microsecond() {
        let start = time::now() + Duration::nanoseconds(100);
        let mut offer = draft();
        let before = offer.clone();
        assert!(matches!(
            offer.schedule(start, Some(start + Duration::nanoseconds(500))),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(offer, before);

        offer
            .schedule(start, Some(start + Duration::microseconds(1)))
            .unwrap();
        assert!(offer.end_date().unwrap() > offer.start_date());
        assert_eq!(Offer::restore(parts_of(&offer)).unwrap(), offer);
    }

    #[test]
    fn test_restore_checks_window_at_storage_precision() {
        let offer = draft();
        let start = offer.start_date() + Duration::nanoseconds(100);
        let parts = OfferParts {
            start_date: start,
            end_date: Some(start + Duration::nanoseconds(300)),
            ..parts_of(&offer)
        };
        assert!(matches!(Offer::restore(parts), Err(DomainError::Validation(_))));
    }

    fn parts_of(offer: &Offer) -> OfferParts {
        OfferParts {
            id: offer.id(),
            seller_id: offer.seller_id(),
            title: offer.title().to_string(),
            description: offer.description().to_string(),
            category: offer.category().map(str::to_string),
            price: offer.price().clone(),
            original_price: offer.original_price().clone(),
            picture_url: offer.picture_url().map(str::to_string),
            start_date: offer.start_date(),
            end_date: offer.end_date(),
            expiration_date: offer.expiration_date(),
            status: offer.status(),
            status_history: offer.status_history().to_vec(),
        }
    }

    #[test]
    fn test_restore_revalidates_price() {
        let offer = draft();
        let parts = OfferParts {
            id: offer.id(),
            seller_id: offer.seller_id(),
            title: offer.title().to_string(),
            description: offer.description().to_string(),
            category: None,
            price: eur(200),
            original_price: eur(100),
            picture_url: None,
            start_date: offer.start_date(),
            end_date: None,
            expiration_date: offer.expiration_date(),
            status: OfferStatus::Draft,
            status_history: Vec::new(),
        };
        assert!(matches!(Offer::restore(parts), Err(DomainError::InvalidPrice(_))));
    }
}
