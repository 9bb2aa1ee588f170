//! Image entity - A generated image owned by one user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Image database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "images")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Internal (normalized) id of the owning user
    pub user_id: Uuid,
    /// Prompt the image was generated from
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    #[sea_orm(column_type = "Text")]
    pub image_url: String,
    /// Set once at creation
    pub created_at: DateTimeUtc,
}

/// `Image` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
