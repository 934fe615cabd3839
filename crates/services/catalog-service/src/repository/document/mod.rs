//! MongoDB storage backend.
//!
//! One collection per entity. Ids are stored as UUID strings in `_id`,
//! enums by their canonical names, decimals as strings and timestamps as
//! RFC 3339 strings. Money and addresses are embedded sub-documents, and an
//! offer embeds its status history.

mod collections;
mod models;

pub use collections::{
    CityCollection, OfferCollection, ProductCollection, SellerCollection, UserCollection,
};

pub const USERS: &str = "users";
pub const SELLERS: &str = "sellers";
pub const OFFERS: &str = "offers";
pub const PRODUCTS: &str = "products";
pub const CITIES: &str = "cities";
