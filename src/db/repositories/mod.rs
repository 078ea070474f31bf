pub mod books;
pub mod exclusions;
pub mod goals;
pub mod movies;
pub mod reviews;
pub mod shows;
pub mod stats;
pub mod tropes;
