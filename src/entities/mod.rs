pub mod prelude;

pub mod books;
pub mod dismissed_media;
pub mod goals;
pub mod movies;
pub mod reviews;
pub mod shows;
pub mod trope_preferences;
pub mod user_books;
pub mod user_movies;
pub mod user_shows;
pub mod wishlist;
