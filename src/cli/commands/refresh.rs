use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_refresh(config: &Config, force: bool) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let outcome = if force {
        println!("Refreshing all refreshable shows...");
        state.upcoming_service.force_refresh().await?
    } else {
        println!("Refreshing stale shows...");
        state.upcoming_service.refresh_stale().await?
    };

    println!(
        "Done: {} refreshed, {} failed",
        outcome.refreshed, outcome.failed
    );

    Ok(())
}
