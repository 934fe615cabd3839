//! Common utilities shared across the catalog crates.
//!
//! This crate provides:
//! - The application error taxonomy and storage-error classification
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
