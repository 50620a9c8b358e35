//! Search query construction.

use serde::{Deserialize, Serialize};

/// Optional filters accepted by `GET /search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub name: Option<String>,
    pub team: Option<String>,
    pub category: Option<String>,
    pub universe: Option<String>,
    pub status: Option<String>,
    /// Kept as a string; the backend owns numeric interpretation.
    pub strength: Option<String>,
}

impl SearchFilters {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_strength(mut self, strength: impl Into<String>) -> Self {
        self.strength = Some(strength.into());
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }
}

/// Output of [`build_search_query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// No filter was given; the fetch layer returns an empty result without a request.
    NoOp,
    /// Present filters in a fixed order, values untouched.
    Params(Vec<(&'static str, String)>),
}

impl SearchQuery {
    pub fn is_noop(&self) -> bool {
        matches!(self, SearchQuery::NoOp)
    }

    /// Query pairs to send to the backend (empty for `NoOp`).
    pub fn pairs(&self) -> &[(&'static str, String)] {
        match self {
            SearchQuery::NoOp => &[],
            SearchQuery::Params(pairs) => pairs,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs().iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
    }
}

/// Keep only the filters that are present.
///
/// A blank string counts as absent: an address like `?q=` carries no filter.
/// Present values are passed through untrimmed.
pub fn build_search_query(filters: &SearchFilters) -> SearchQuery {
    let fields = [
        ("name", &filters.name),
        ("team", &filters.team),
        ("category", &filters.category),
        ("universe", &filters.universe),
        ("status", &filters.status),
        ("strength", &filters.strength),
    ];

    let pairs: Vec<(&'static str, String)> = fields
        .into_iter()
        .filter_map(|(key, value)| match value.as_deref() {
            Some(v) if !v.trim().is_empty() => Some((key, v.to_string())),
            _ => None,
        })
        .collect();

    if pairs.is_empty() {
        SearchQuery::NoOp
    } else {
        SearchQuery::Params(pairs)
    }
}
