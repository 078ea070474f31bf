use std::sync::Arc;

use crate::clients::{BookSource, GoogleBooksClient, OpenLibraryClient, TmdbClient};
use crate::config::Config;
use crate::domain::MediaType;
use crate::models::SearchResult;
use crate::services::SearchService;

pub async fn cmd_search(
    config: &Config,
    query: &str,
    media_type: Option<&str>,
) -> anyhow::Result<()> {
    let filter = media_type
        .map(str::parse::<MediaType>)
        .transpose()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("Searching for: {query}");

    let book_sources: Vec<Arc<dyn BookSource>> = vec![
        Arc::new(OpenLibraryClient::new()),
        Arc::new(GoogleBooksClient::new()),
    ];
    let search = SearchService::new(
        book_sources,
        Arc::new(TmdbClient::new(config.providers.tmdb_api_key.clone())),
    );

    let results = search.search(query, filter).await;

    if results.is_empty() {
        println!("No results found for '{query}'");
        return Ok(());
    }

    println!();
    println!("Search Results:");
    println!("{:-<60}", "");

    for result in &results {
        match result {
            SearchResult::Book(book) => {
                let year = book
                    .first_publish_year
                    .map_or_else(|| "?".to_string(), |y| y.to_string());
                println!("[book]  {} ({})", book.title, year);
                if !book.authors.is_empty() {
                    println!("        by {}", book.authors.join(", "));
                }
            }
            SearchResult::Movie(movie) => {
                let year = movie
                    .release_date
                    .as_deref()
                    .and_then(|d| d.get(..4))
                    .unwrap_or("?");
                println!("[movie] {} ({}) | ID: {}", movie.title, year, movie.id);
            }
            SearchResult::Show(show) => {
                let year = show
                    .first_air_date
                    .as_deref()
                    .and_then(|d| d.get(..4))
                    .unwrap_or("?");
                println!("[show]  {} ({}) | ID: {}", show.title, year, show.id);
            }
        }
    }

    println!();
    println!("{} results", results.len());

    Ok(())
}
