//! Clock helpers.
//!
//! PostgreSQL keeps microseconds, so every timestamp the domain produces or
//! accepts is truncated to that precision. Without it a value read back from
//! the relational store would differ from the one held in memory.

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at storage precision.
pub fn now() -> DateTime<Utc> {
    normalize(Utc::now())
}

/// Truncate a timestamp to microseconds.
pub fn normalize(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}
