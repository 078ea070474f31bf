use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Sparse: tropes without a row are implicitly neutral.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "trope_preferences")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub trope: String,
    /// One of `love|like|neutral|dislike|blacklist`.
    pub affinity: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
