use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    /// Open Library work key, e.g. `OL45883W`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    /// JSON array of author names.
    pub authors: String,
    pub description: Option<String>,
    /// JSON array of subject tags.
    pub genres: Option<String>,
    pub cover_url: Option<String>,
    pub first_publish_year: Option<i32>,
    pub provider_rating: Option<f64>,
    pub fetched_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user_books::Entity")]
    UserBooks,
}

impl Related<super::user_books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserBooks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
