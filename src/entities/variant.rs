//! Variant entity - One purchasable variant (size, color, ...) of a product.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Variant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_variants")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: Uuid,
    /// Variant id on the Printify side
    pub printify_variant_id: i64,
    pub title: String,
    pub sku: Option<String>,
    /// Price in cents
    pub price: i64,
    pub price_formatted: Option<String>,
    /// Cost in cents
    pub cost: Option<i64>,
    pub profit: Option<i64>,
    pub is_enabled: bool,
    pub is_default: bool,
    /// Printify option ids, stored as a JSON array
    pub options: Json,
}

/// Defines relationships between Variant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each variant belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
