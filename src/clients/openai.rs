use crate::clients::{ProviderError, Recommender};
use crate::models::{Constraints, RecommendationCandidate, RecommendationContext};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::OnceLock;

const OPENAI_API: &str = "https://api.openai.com/v1";

const SYSTEM_PROMPT: &str = "You are a recommendation engine for a personal media tracker. \
Reply with a JSON array only, no prose. Each element has the keys \
\"title\", \"mediaType\" (one of \"book\", \"movie\", \"show\"), \"year\" \
(integer or null), and \"reason\" (one sentence tied to the user's taste). \
Never recommend anything whose title appears in excludedTitles.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Models wrap JSON in markdown fences more often than not. Accept a fenced
/// block, a bare array, or an array buried in surrounding prose.
fn extract_json(content: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\[.*?\])\s*```").expect("Invalid regex")
    });

    if let Some(captures) = re.captures(content) {
        return captures.get(1).map(|m| m.as_str());
    }

    let start = content.find('[')?;
    let end = content.rfind(']')?;
    (start < end).then(|| &content[start..=end])
}

fn parse_candidates(content: &str) -> Result<Vec<RecommendationCandidate>, ProviderError> {
    let json = extract_json(content).ok_or_else(|| ProviderError::Decode {
        provider: "openai",
        message: format!("no JSON array in reply: {content}"),
    })?;
    serde_json::from_str(json).map_err(|e| ProviderError::Decode {
        provider: "openai",
        message: e.to_string(),
    })
}

fn build_user_prompt(
    context: &RecommendationContext,
    query: &str,
    constraints: &Constraints,
) -> Result<String, ProviderError> {
    let context_json = serde_json::to_string(context).map_err(|e| ProviderError::Decode {
        provider: "openai",
        message: e.to_string(),
    })?;

    let mut prompt = format!("User library context:\n{context_json}\n\nRequest: {query}\n");
    if !constraints.media_types.is_empty() {
        let types: Vec<&str> = constraints
            .media_types
            .iter()
            .map(|t| t.as_str())
            .collect();
        let _ = writeln!(prompt, "Only recommend these media types: {}.", types.join(", "));
    }
    if let Some(year) = constraints.min_year {
        let _ = writeln!(prompt, "Only recommend titles released in {year} or later.");
    }
    Ok(prompt)
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    #[must_use]
    pub const fn with_shared_client(client: Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    fn key(&self) -> Result<&str, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredential("OPENAI_API_KEY"));
        }
        Ok(&self.api_key)
    }
}

#[async_trait]
impl Recommender for OpenAiClient {
    async fn recommend(
        &self,
        context: &RecommendationContext,
        query: &str,
        constraints: &Constraints,
    ) -> Result<Vec<RecommendationCandidate>, ProviderError> {
        let key = self.key()?;
        let user_prompt = build_user_prompt(context, query, constraints)?;
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: 0.8,
        };

        let response = self
            .client
            .post(format!("{OPENAI_API}/chat/completions"))
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: "openai",
                status,
                body,
            });
        }

        let response: ChatResponse = response.json().await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::Decode {
                provider: "openai",
                message: "reply carried no choices".to_string(),
            })?;

        parse_candidates(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaType;

    #[test]
    fn bare_arrays_pass_through() {
        assert_eq!(extract_json(r#"[{"title":"Dune"}]"#), Some(r#"[{"title":"Dune"}]"#));
    }

    #[test]
    fn fenced_arrays_are_unwrapped() {
        let content = "Here you go:\n```json\n[{\"title\":\"Dune\"}]\n```\nEnjoy!";
        assert_eq!(extract_json(content), Some(r#"[{"title":"Dune"}]"#));
    }

    #[test]
    fn arrays_inside_prose_are_found() {
        let content = "Sure! [1, 2, 3] is what you want.";
        assert_eq!(extract_json(content), Some("[1, 2, 3]"));
    }

    #[test]
    fn replies_without_an_array_are_rejected() {
        assert!(extract_json("I cannot help with that.").is_none());
        assert!(parse_candidates("no json here").is_err());
    }

    #[test]
    fn candidates_parse_from_camel_case_keys() {
        let content = r#"[
            {"title": "Hyperion", "mediaType": "book", "year": 1989, "reason": "Epic space opera."},
            {"title": "Severance", "mediaType": "show", "year": null, "reason": "Slow-burn mystery."}
        ]"#;
        let candidates = parse_candidates(content).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "Hyperion");
        assert_eq!(candidates[0].media_type, MediaType::Book);
        assert_eq!(candidates[0].year, Some(1989));
        assert_eq!(candidates[1].media_type, MediaType::Show);
        assert_eq!(candidates[1].year, None);
    }

    #[test]
    fn constraints_shape_the_prompt() {
        let context = RecommendationContext {
            books: Vec::new(),
            movies: Vec::new(),
            shows: Vec::new(),
            excluded_titles: vec!["Dune".to_string()],
            loved_tropes: Vec::new(),
            liked_tropes: Vec::new(),
            disliked_tropes: Vec::new(),
            blacklisted_tropes: Vec::new(),
        };
        let constraints = Constraints {
            media_types: vec![MediaType::Book, MediaType::Show],
            min_year: Some(2000),
        };
        let prompt = build_user_prompt(&context, "something hopeful", &constraints).unwrap();
        assert!(prompt.contains("\"excludedTitles\":[\"Dune\"]"));
        assert!(prompt.contains("Request: something hopeful"));
        assert!(prompt.contains("book, show"));
        assert!(prompt.contains("2000 or later"));
    }
}
