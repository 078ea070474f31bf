mod init;
mod refresh;
mod search;

pub use init::cmd_init;
pub use refresh::cmd_refresh;
pub use search::cmd_search;
