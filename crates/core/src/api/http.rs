use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use super::{HeroApi, PageRequest};
use crate::error::{HeroError, HeroResult};
use crate::model::{Hero, PagedHeroes, SummaryInformation};

/// Path of the hero resource under the server's base URL.
pub const DEFAULT_API_PATH: &str = "api/heroes";

/// Longest error body kept in a `Server` error message.
const MAX_ERROR_BODY: usize = 200;

/// [`HeroApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpHeroApi {
    base_url: String,
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpHeroApi {
    /// Client for a server at `base_url` (e.g. `http://localhost:3000`).
    ///
    /// Heroes are served from `{base_url}/api/heroes`, images from `{base_url}/images`.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Self::with_api_path(base_url, DEFAULT_API_PATH)
    }

    pub fn with_api_path(base_url: &str, api_path: &str) -> Result<Self, url::ParseError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&format!("{base_url}/"))?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        let endpoint = base.join(&format!("{}/", api_path.trim_matches('/')))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("hero-browser/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Ok(Self { base_url, endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url_for(&self, segment: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        if let Some(segment) = segment {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(segment);
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        not_found: Option<&str>,
    ) -> HeroResult<T> {
        tracing::debug!(url = %url, ?query, "GET");

        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| HeroError::Network(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| HeroError::Network(e.to_string()))?;

        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(id_or_slug) = not_found {
                return Err(HeroError::not_found(id_or_slug));
            }
        }
        if !status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "request failed");
            return Err(HeroError::Server {
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        serde_json::from_str(&body).map_err(|e| HeroError::Decode(e.to_string()))
    }
}

#[async_trait]
impl HeroApi for HttpHeroApi {
    async fn list_heroes(&self, request: &PageRequest) -> HeroResult<PagedHeroes> {
        self.get_json(self.url_for(None), &request.query_pairs(), None).await
    }

    async fn get_hero(&self, id_or_slug: &str) -> HeroResult<Hero> {
        self.get_json(self.url_for(Some(id_or_slug)), &[], Some(id_or_slug)).await
    }

    async fn search_heroes(&self, pairs: &[(&'static str, String)]) -> HeroResult<Vec<Hero>> {
        self.get_json(self.url_for(Some("search")), pairs, None).await
    }

    async fn summary(&self) -> HeroResult<SummaryInformation> {
        self.get_json(self.url_for(Some("summary")), &[], None).await
    }

    fn image_base_url(&self) -> &str {
        &self.base_url
    }
}

/// Prefer the backend's `message` field, fall back to the raw body, then the reason phrase.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status.canonical_reason().unwrap_or("request failed").to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        let api = HttpHeroApi::new("http://localhost:3000/").unwrap();
        assert_eq!(api.image_base_url(), "http://localhost:3000");
        assert_eq!(api.url_for(None).as_str(), "http://localhost:3000/api/heroes/");
        assert_eq!(
            api.url_for(Some("clark-kent")).as_str(),
            "http://localhost:3000/api/heroes/clark-kent"
        );
        assert_eq!(api.url_for(Some("search")).as_str(), "http://localhost:3000/api/heroes/search");
    }

    #[test]
    fn ids_are_escaped_as_one_segment() {
        let api = HttpHeroApi::new("http://localhost:3000").unwrap();
        assert_eq!(api.url_for(Some("a/b")).as_str(), "http://localhost:3000/api/heroes/a%2Fb");
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(HttpHeroApi::new("not a url").is_err());
    }

    #[test]
    fn error_message_prefers_json_message() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        assert_eq!(
            error_message(r#"{"message":"limit must be positive"}"#, status),
            "limit must be positive"
        );
        assert_eq!(error_message("", status), "Bad Request");
        assert_eq!(error_message("oops", status), "oops");
    }
}
