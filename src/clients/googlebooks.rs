use crate::clients::{BookSource, ProviderError};
use crate::models::Book;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::OnceLock;

const GOOGLE_BOOKS_API: &str = "https://www.googleapis.com/books/v1";

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    items: Option<Vec<Volume>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    id: String,
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    description: Option<String>,
    categories: Option<Vec<String>>,
    /// `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`.
    published_date: Option<String>,
    image_links: Option<ImageLinks>,
    average_rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

/// Volume descriptions arrive as HTML fragments.
fn strip_html(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("Invalid regex"));
    re.replace_all(text, "").trim().to_string()
}

fn publish_year(date: &str) -> Option<i32> {
    date.get(..4).and_then(|y| y.parse().ok())
}

#[derive(Clone)]
pub struct GoogleBooksClient {
    client: Client,
}

impl Default for GoogleBooksClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleBooksClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    #[must_use]
    pub const fn with_shared_client(client: Client) -> Self {
        Self { client }
    }

    fn map_volume(volume: Volume) -> Option<Book> {
        let info = volume.volume_info;
        let title = info.title?;
        Some(Book {
            id: volume.id,
            title,
            authors: info.authors.unwrap_or_default(),
            description: info.description.as_deref().map(strip_html),
            genres: info.categories.unwrap_or_default(),
            cover_url: info
                .image_links
                .and_then(|links| links.thumbnail)
                .map(|url| url.replacen("http://", "https://", 1)),
            first_publish_year: info.published_date.as_deref().and_then(publish_year),
            provider_rating: info.average_rating,
        })
    }
}

#[async_trait]
impl BookSource for GoogleBooksClient {
    fn name(&self) -> &'static str {
        "googlebooks"
    }

    async fn search_books(&self, query: &str, limit: usize) -> Result<Vec<Book>, ProviderError> {
        let url = format!(
            "{}/volumes?q={}&maxResults={}&printType=books",
            GOOGLE_BOOKS_API,
            urlencoding::encode(query),
            limit.min(40)
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: "googlebooks",
                status,
                body,
            });
        }

        let response: VolumesResponse = response.json().await?;

        Ok(response
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(Self::map_volume)
            .take(limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_fragments_are_stripped_from_descriptions() {
        assert_eq!(
            strip_html("<p>A <b>bold</b> tale.</p>"),
            "A bold tale."
        );
        assert_eq!(strip_html("plain"), "plain");
    }

    #[test]
    fn publish_year_handles_partial_dates() {
        assert_eq!(publish_year("1969"), Some(1969));
        assert_eq!(publish_year("1969-03"), Some(1969));
        assert_eq!(publish_year("1969-03-01"), Some(1969));
        assert_eq!(publish_year("n.d."), None);
    }

    #[test]
    fn thumbnails_are_upgraded_to_https() {
        let volume = Volume {
            id: "abc123".to_string(),
            volume_info: VolumeInfo {
                title: Some("Hyperion".to_string()),
                authors: None,
                description: None,
                categories: None,
                published_date: None,
                image_links: Some(ImageLinks {
                    thumbnail: Some("http://books.google.com/thumb.jpg".to_string()),
                }),
                average_rating: None,
            },
        };
        let book = GoogleBooksClient::map_volume(volume).unwrap();
        assert_eq!(
            book.cover_url.as_deref(),
            Some("https://books.google.com/thumb.jpg")
        );
    }
}
