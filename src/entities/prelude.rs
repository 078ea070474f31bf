pub use super::books::Entity as Books;
pub use super::dismissed_media::Entity as DismissedMedia;
pub use super::goals::Entity as Goals;
pub use super::movies::Entity as Movies;
pub use super::reviews::Entity as Reviews;
pub use super::shows::Entity as Shows;
pub use super::trope_preferences::Entity as TropePreferences;
pub use super::user_books::Entity as UserBooks;
pub use super::user_movies::Entity as UserMovies;
pub use super::user_shows::Entity as UserShows;
pub use super::wishlist::Entity as Wishlist;
