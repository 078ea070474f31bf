use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shows")]
pub struct Model {
    /// TMDB series id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    /// JSON array of genre names.
    pub genres: Option<String>,
    pub poster_url: Option<String>,
    pub first_air_date: Option<String>,
    pub provider_rating: Option<f64>,
    /// Provider lifecycle string (`Returning Series`, `Ended`, `Canceled`, ...).
    /// Terminal values stop the upcoming-episode refresh from re-fetching.
    pub provider_status: Option<String>,
    /// The four next_episode_* columns are written and cleared together,
    /// only by the refresh path. Air date is `YYYY-MM-DD`.
    pub next_episode_air_date: Option<String>,
    pub next_episode_season: Option<i32>,
    pub next_episode_number: Option<i32>,
    pub next_episode_name: Option<String>,
    pub upcoming_updated_at: Option<String>,
    pub fetched_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user_shows::Entity")]
    UserShows,
}

impl Related<super::user_shows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserShows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
