//! Credits entity - One balance row per internal user id.
//!
//! Rows are created lazily on first access and never deleted; a reset
//! writes zero instead.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Credit balance database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credits")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Internal (normalized) user id
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    /// Remaining credits, never negative
    pub amount: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Credits have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the user can still pay for one generation. Derived, never stored.
    pub fn can_generate(&self) -> bool {
        self.amount > 0
    }
}
