//! hero-core
//!
//! Core library for browsing a hero catalog: paged listing, search, single
//! hero lookup, and a locally persisted favorites set.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends. The CLI is a thin shell over [`browser::HeroBrowser`].

pub mod actions;
pub mod api;
pub mod browser;
pub mod cache;
pub mod config;
pub mod error;
pub mod favorites;
pub mod images;
pub mod model;
pub mod pagination;
pub mod params;
pub mod search;

pub use error::{HeroError, HeroResult};

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
