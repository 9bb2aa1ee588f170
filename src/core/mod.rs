//! Core business logic - framework-agnostic credit, image and product operations.
//!
//! Nothing in here knows about HTTP; every operation takes a SeaORM connection
//! (or transaction) and returns [`crate::errors::Result`].

/// Credit ledger with atomic debit and credit
pub mod credits;
/// External user id to internal UUID mapping
pub mod identity;
/// Generated image records
pub mod image;
/// Page/limit parsing and pagination metadata
pub mod pagination;
/// Printify products with variants and mockup images
pub mod product;

/// Treats `None`, empty and whitespace-only strings alike as missing.
pub(crate) fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}
