//! Core data model for the hero catalog.
//!
//! These types mirror the backend's JSON payloads (camelCase keys). Every
//! field is defaulted on decode so partially populated records (as some list
//! endpoints and fixtures return) still deserialize.

use serde::{Deserialize, Serialize};

/// Whether a character fights for or against the good guys.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HeroCategory {
    #[default]
    Hero,
    Villain,
}

impl HeroCategory {
    /// Value used by the backend's `category` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            HeroCategory::Hero => "hero",
            HeroCategory::Villain => "villain",
        }
    }
}

/// Lifecycle status reported by the backend.
///
/// The backend owns this vocabulary; unrecognized values are kept verbatim in
/// `Other` so stored snapshots round-trip unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum HeroStatus {
    #[default]
    Active,
    Inactive,
    Deceased,
    Other(String),
}

impl HeroStatus {
    pub fn as_str(&self) -> &str {
        match self {
            HeroStatus::Active => "Active",
            HeroStatus::Inactive => "Inactive",
            HeroStatus::Deceased => "Deceased",
            HeroStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for HeroStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Active" => HeroStatus::Active,
            "Inactive" => HeroStatus::Inactive,
            "Deceased" => HeroStatus::Deceased,
            _ => HeroStatus::Other(raw),
        }
    }
}

impl From<HeroStatus> for String {
    fn from(status: HeroStatus) -> Self {
        match status {
            HeroStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for HeroStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hero or villain record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Hero {
    /// Backend identity (e.g. `"1"`).
    pub id: String,
    /// Stable human-readable key (e.g. `"clark-kent"`).
    pub slug: String,
    pub name: String,
    pub alias: String,
    pub powers: Vec<String>,
    pub description: String,
    pub strength: u8,
    pub intelligence: u8,
    pub speed: u8,
    pub durability: u8,
    pub team: String,
    /// Bare filename as stored by the backend, or an absolute URL once resolved.
    pub image: String,
    pub first_appearance: String,
    pub status: HeroStatus,
    pub category: HeroCategory,
    pub universe: String,
}

impl Hero {
    /// Minimal record with only identity fields set; handy for fixtures.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), ..Self::default() }
    }

    /// Builder-style helper to set the slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    /// Builder-style helper to set the image filename.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Builder-style helper to set the category.
    pub fn with_category(mut self, category: HeroCategory) -> Self {
        self.category = category;
        self
    }
}

/// Aggregate statistics computed server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryInformation {
    pub total_heroes: u32,
    pub strongest_hero: Option<Hero>,
    pub smartest_hero: Option<Hero>,
    pub hero_count: u32,
    pub villain_count: u32,
}

/// One page of heroes as returned by `GET /`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PagedHeroes {
    /// Total number of heroes matching the category.
    pub total: u32,
    /// Number of pages at the requested limit.
    pub pages: u32,
    pub heroes: Vec<Hero>,
}
