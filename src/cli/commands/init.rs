use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml with default settings.");
        println!("Set TMDB_API_KEY and OPENAI_API_KEY (env or config) to enable providers.");
    } else {
        println!("config.toml already exists, leaving it alone.");
    }
    Ok(())
}
