use crate::clients::{BookSource, ProviderError};
use crate::models::Book;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const OPENLIBRARY_API: &str = "https://openlibrary.org";
const COVERS_BASE: &str = "https://covers.openlibrary.org/b/id";

/// Subject lists on popular works run to the hundreds; keep a readable few.
const MAX_SUBJECTS: usize = 8;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    docs: Vec<Doc>,
}

#[derive(Debug, Deserialize)]
struct Doc {
    /// Work key in path form, e.g. `/works/OL45883W`.
    key: String,
    title: Option<String>,
    author_name: Option<Vec<String>>,
    first_publish_year: Option<i32>,
    cover_i: Option<i64>,
    subject: Option<Vec<String>>,
    ratings_average: Option<f64>,
}

#[derive(Clone)]
pub struct OpenLibraryClient {
    client: Client,
}

impl Default for OpenLibraryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenLibraryClient {
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

    fn map_doc(doc: Doc) -> Option<Book> {
        let title = doc.title?;
        Some(Book {
            id: doc.key.trim_start_matches("/works/").to_string(),
            title,
            authors: doc.author_name.unwrap_or_default(),
            description: None,
            genres: doc
                .subject
                .unwrap_or_default()
                .into_iter()
                .take(MAX_SUBJECTS)
                .collect(),
            cover_url: doc.cover_i.map(|id| format!("{COVERS_BASE}/{id}-M.jpg")),
            first_publish_year: doc.first_publish_year,
            provider_rating: doc.ratings_average,
        })
    }
}

#[async_trait]
impl BookSource for OpenLibraryClient {
    fn name(&self) -> &'static str {
        "openlibrary"
    }

    async fn search_books(&self, query: &str, limit: usize) -> Result<Vec<Book>, ProviderError> {
        let url = format!(
            "{}/search.json?q={}&limit={}&fields=key,title,author_name,first_publish_year,cover_i,subject,ratings_average",
            OPENLIBRARY_API,
            urlencoding::encode(query),
            limit
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: "openlibrary",
                status,
                body,
            });
        }

        let response: SearchResponse = response.json().await?;

        Ok(response
            .docs
            .into_iter()
            .filter_map(Self::map_doc)
            .take(limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_key_is_stripped_to_the_bare_id() {
        let doc = Doc {
            key: "/works/OL45883W".to_string(),
            title: Some("The Left Hand of Darkness".to_string()),
            author_name: Some(vec!["Ursula K. Le Guin".to_string()]),
            first_publish_year: Some(1969),
            cover_i: Some(12_345),
            subject: None,
            ratings_average: Some(4.2),
        };
        let book = OpenLibraryClient::map_doc(doc).unwrap();
        assert_eq!(book.id, "OL45883W");
        assert_eq!(
            book.cover_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/12345-M.jpg")
        );
    }

    #[test]
    fn docs_without_titles_are_dropped() {
        let doc = Doc {
            key: "/works/OL1W".to_string(),
            title: None,
            author_name: None,
            first_publish_year: None,
            cover_i: None,
            subject: None,
            ratings_average: None,
        };
        assert!(OpenLibraryClient::map_doc(doc).is_none());
    }

    #[test]
    fn subject_lists_are_capped() {
        let doc = Doc {
            key: "/works/OL2W".to_string(),
            title: Some("Dune".to_string()),
            author_name: None,
            first_publish_year: None,
            cover_i: None,
            subject: Some((0..50).map(|i| format!("subject-{i}")).collect()),
            ratings_average: None,
        };
        let book = OpenLibraryClient::map_doc(doc).unwrap();
        assert_eq!(book.genres.len(), MAX_SUBJECTS);
    }
}
