//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                           - Health check
//! GET    /api/health                 - Health check
//!
//! # Images
//! POST   /api/images                 - Save an image
//! GET    /api/images?userId&page&limit - List a user's images
//! GET    /api/images/{id}?userId     - Image detail
//! DELETE /api/images/{id}?userId     - Delete an image
//!
//! # Products
//! POST   /api/products               - Save a product with variants and mockups
//! GET    /api/products?userId&page&limit - List a user's products
//! GET    /api/products/{id}?userId   - Product detail
//! PUT    /api/products/{id}?userId   - Update title, description or margin
//! DELETE /api/products/{id}?userId   - Delete a product and its children
//!
//! # Credits
//! GET    /api/credits/{userId}       - Balance (created on first access)
//! POST   /api/credits/use            - Spend credits
//! POST   /api/credits/add            - Add credits (payment webhook)
//! POST   /api/credits/reset/{userId} - Zero the balance
//! ```

pub mod credits;
pub mod health;
pub mod images;
pub mod products;

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::errors::Error;

/// `?userId=` with nothing after it is the same as leaving it out.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// `?userId=` restricting a single-record lookup to its owner.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub user_id: Option<String>,
}

/// `?userId=&page=&limit=` for list endpoints. Page values stay strings
/// until [`crate::core::pagination::PageRequest::parse`] validates them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub user_id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A path id that is not a UUID cannot name any record.
pub(crate) fn parse_record_id(raw: &str, entity: &'static str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| Error::NotFound { entity })
}
