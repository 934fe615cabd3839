//! Domain-level constants.
//!
//! Stored string forms of the enums, defaults and authentication limits.

// =============================================================================
// User Roles
// =============================================================================

/// Role of a customer browsing offers
pub const ROLE_CUSTOMER: &str = "CUSTOMER";

/// Role of a user owning a seller profile
pub const ROLE_SELLER: &str = "SELLER";

/// Administrator role (moderation)
pub const ROLE_ADMIN: &str = "ADMIN";

// =============================================================================
// Seller Status
// =============================================================================

pub const SELLER_STATUS_PENDING: &str = "PENDING";
pub const SELLER_STATUS_APPROVED: &str = "APPROVED";
pub const SELLER_STATUS_REJECTED: &str = "REJECTED";

// =============================================================================
// Offer Status
// =============================================================================

pub const OFFER_STATUS_DRAFT: &str = "DRAFT";
pub const OFFER_STATUS_PENDING_VALIDATION: &str = "PENDING_VALIDATION";
pub const OFFER_STATUS_PUBLISHED: &str = "PUBLISHED";
pub const OFFER_STATUS_REJECTED: &str = "REJECTED";

// =============================================================================
// Addresses
// =============================================================================

/// Country used when an address does not name one
pub const DEFAULT_COUNTRY: &str = "France";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Longest accepted JWT lifetime in hours (one year)
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 8760;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
