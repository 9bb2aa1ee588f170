//! Product entity - A Printify product saved by a user.
//!
//! Each product owns its variants and mockup images. Both child tables
//! reference the product with `ON DELETE CASCADE`, so removing a product
//! never leaves orphaned rows behind.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Internal (normalized) id of the owning user
    pub user_id: Uuid,
    /// Product id on the Printify side
    pub printify_id: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Printify catalog blueprint (e.g. 5 for a basic t-shirt)
    pub blueprint_id: i32,
    pub print_provider_id: i32,
    /// Margin percentage applied on top of the base cost
    pub margin_applied: f64,
    pub original_image_url: String,
    pub printify_image_id: String,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many variants
    #[sea_orm(has_many = "super::variant::Entity")]
    Variants,
    /// One product has many mockup images
    #[sea_orm(has_many = "super::product_image::Entity")]
    Images,
}

impl Related<super::variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variants.def()
    }
}

impl Related<super::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
