//! Product image entity - A mockup image attached to a product.
//!
//! Each image lists the variants it depicts through `variant_ref` rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product image database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_images")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub src: String,
    /// Camera position, e.g. `"front"` or `"back"`
    pub position: Option<String>,
    pub is_default: bool,
    pub is_selected_for_publishing: bool,
    pub order: Option<i32>,
}

/// Defines relationships between `ProductImage` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each image belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    /// One image references many variants
    #[sea_orm(has_many = "super::variant_ref::Entity")]
    VariantRefs,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::variant_ref::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VariantRefs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
