//! Variant reference entity - Links a product image to one Printify variant id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Variant reference database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_image_variants")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_image_id: i64,
    /// Printify variant id shown on the image
    pub variant_id: i64,
}

/// Defines relationships between `VariantRef` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each reference belongs to one product image
    #[sea_orm(
        belongs_to = "super::product_image::Entity",
        from = "Column::ProductImageId",
        to = "super::product_image::Column::Id",
        on_delete = "Cascade"
    )]
    ProductImage,
}

impl Related<super::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductImage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
