pub mod recommendations;
pub use recommendations::{RecommendError, RecommendationService, build_context};

pub mod search;
pub use search::SearchService;

pub mod upcoming;
pub use upcoming::{RefreshOutcome, UpcomingSchedule, UpcomingService};
