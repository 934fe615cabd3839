//! SeaORM entities for the relational backend.
//!
//! Each entity converts to its domain type through the domain `restore`
//! constructor, so a corrupt row surfaces as a domain error instead of an
//! entity that breaks its own invariants.

pub mod city;
pub mod offer;
pub mod offer_status_change;
pub mod product;
pub mod seller;
pub mod user;
