//! Transport to the hero backend.
//!
//! [`HeroApi`] is the seam between fetch logic and the network. The HTTP
//! implementation lives in [`http`]; [`mock`] records requests and serves
//! canned responses for tests and offline runs.

mod http;
mod mock;

pub use http::{HttpHeroApi, DEFAULT_API_PATH};
pub use mock::{MockHeroApi, RecordedRequest};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::HeroResult;
use crate::model::{Hero, PagedHeroes, SummaryInformation};

/// Query for one page of the listing endpoint, already in backend terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
    pub category: String,
}

impl PageRequest {
    /// Translate a 1-based page into an offset. Page 0 is treated as page 1.
    pub fn from_page(page: u32, limit: u32, category: impl Into<String>) -> Self {
        Self {
            offset: page.max(1).saturating_sub(1).saturating_mul(limit),
            limit,
            category: category.into(),
        }
    }

    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
            ("category", self.category.clone()),
        ]
    }
}

/// Backend endpoints consumed by the browser.
#[async_trait]
pub trait HeroApi: Send + Sync {
    /// `GET /?offset&limit&category`
    async fn list_heroes(&self, request: &PageRequest) -> HeroResult<PagedHeroes>;

    /// `GET /{idOrSlug}`
    async fn get_hero(&self, id_or_slug: &str) -> HeroResult<Hero>;

    /// `GET /search` with the given filter pairs.
    async fn search_heroes(&self, pairs: &[(&'static str, String)]) -> HeroResult<Vec<Hero>>;

    /// `GET /summary`
    async fn summary(&self) -> HeroResult<SummaryInformation>;

    /// Base URL images are served from.
    fn image_base_url(&self) -> &str;
}
