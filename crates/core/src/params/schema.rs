use serde::{Deserialize, Serialize};

use crate::model::HeroCategory;
use crate::search::SearchFilters;

/// How a parameter's string value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Free text; empty counts as absent.
    Text,
    /// Positive integer; anything else falls back to the default.
    Number,
}

/// Schema entry for one address parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: Option<&'static str>,
}

impl ParamSpec {
    const fn text(name: &'static str, default: Option<&'static str>) -> Self {
        Self { name, kind: ParamKind::Text, default }
    }

    const fn number(name: &'static str, default: &'static str) -> Self {
        Self { name, kind: ParamKind::Number, default: Some(default) }
    }

    /// Whether a raw value is usable as-is for this parameter.
    pub fn accepts(&self, raw: &str) -> bool {
        match self.kind {
            ParamKind::Text => !raw.trim().is_empty(),
            ParamKind::Number => raw.trim().parse::<u32>().map(|n| n >= 1).unwrap_or(false),
        }
    }

    /// Declared default as a number (1 when the schema has none).
    pub fn default_number(&self) -> u32 {
        self.default.and_then(|d| d.parse().ok()).unwrap_or(1)
    }
}

pub const PAGE: ParamSpec = ParamSpec::number("page", "1");
pub const LIMIT: ParamSpec = ParamSpec::number("limit", "5");
pub const CATEGORY: ParamSpec = ParamSpec::text("category", Some("all"));
pub const TAB: ParamSpec = ParamSpec::text("tab", Some("all"));
pub const SEARCH_TEXT: ParamSpec = ParamSpec::text("q", None);
pub const STRENGTH: ParamSpec = ParamSpec::text("strength", None);
pub const ACTIVE_ACCORDION: ParamSpec = ParamSpec::text("active-accordion", None);

/// Every parameter the browser reads from the address.
pub const SCHEMA: &[ParamSpec] =
    &[PAGE, LIMIT, CATEGORY, TAB, SEARCH_TEXT, STRENGTH, ACTIVE_ACCORDION];

/// Tabs on the home screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    All,
    Favorites,
    Heroes,
    Villains,
}

impl Tab {
    /// Parse a tab name; unknown values select `All`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "favorites" => Tab::Favorites,
            "heroes" => Tab::Heroes,
            "villains" => Tab::Villains,
            _ => Tab::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::All => "all",
            Tab::Favorites => "favorites",
            Tab::Heroes => "heroes",
            Tab::Villains => "villains",
        }
    }

    /// Category filter the tab implies. `None` for favorites, which is served locally.
    pub fn category(self) -> Option<&'static str> {
        match self {
            Tab::All => Some("all"),
            Tab::Heroes => Some(HeroCategory::Hero.as_param()),
            Tab::Villains => Some(HeroCategory::Villain.as_param()),
            Tab::Favorites => None,
        }
    }
}

/// Typed parameters for the paged home listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeParams {
    pub page: u32,
    pub limit: u32,
    pub category: String,
    pub tab: Tab,
}

/// Typed parameters for the search screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    /// Free-text search (`q`), sent as the `name` filter.
    pub text: Option<String>,
    pub strength: Option<String>,
    pub active_accordion: Option<String>,
}

impl SearchParams {
    pub fn to_filters(&self) -> SearchFilters {
        SearchFilters {
            name: self.text.clone(),
            strength: self.strength.clone(),
            ..SearchFilters::default()
        }
    }

    pub fn is_accordion_open(&self, id: &str) -> bool {
        self.active_accordion.as_deref() == Some(id)
    }
}
