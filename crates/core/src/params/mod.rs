//! Address-bar query parameter state.
//!
//! The address (`?page=2&tab=heroes`) is the source of truth for what the user
//! is looking at. [`QueryParamStateAdapter`] holds its parsed form, reads typed
//! values through a declared schema, and applies partial writes that leave
//! every untouched key exactly as it was.

mod schema;

pub use schema::{
    HomeParams, ParamKind, ParamSpec, SearchParams, Tab, ACTIVE_ACCORDION, CATEGORY, LIMIT, PAGE,
    SCHEMA, SEARCH_TEXT, STRENGTH, TAB,
};

use indexmap::IndexMap;
use url::form_urlencoded;

/// A single requested change to the parameter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamMutation {
    Set(String),
    Delete,
}

impl ParamMutation {
    pub fn set(value: impl Into<String>) -> Self {
        ParamMutation::Set(value.into())
    }
}

/// Parsed, ordered projection of the address query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParamStateAdapter {
    params: IndexMap<String, String>,
    revision: u64,
}

impl QueryParamStateAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    ///
    /// Never fails: malformed pairs decode as best they can, and for a
    /// repeated key the first occurrence wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = IndexMap::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key.is_empty() {
                continue;
            }
            params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        Self { params, revision: 0 }
    }

    /// Parse the query portion of a full address (`/search?q=bat#top` or an absolute URL).
    pub fn from_address(address: &str) -> Self {
        let without_fragment = address.split('#').next().unwrap_or_default();
        match without_fragment.split_once('?') {
            Some((_, query)) => Self::from_query(query),
            None if without_fragment.contains('=') => Self::from_query(without_fragment),
            None => Self::default(),
        }
    }

    /// Raw value at `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Value at `name`, or `default` when absent.
    pub fn read(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or(default).to_string()
    }

    /// Read a parameter through its schema entry, substituting the declared default.
    pub fn read_spec(&self, spec: &ParamSpec) -> Option<String> {
        match self.get(spec.name) {
            Some(value) if spec.accepts(value) => Some(value.to_string()),
            _ => spec.default.map(str::to_string),
        }
    }

    /// Lenient positive-integer read: anything unparsable or below 1 becomes the default.
    pub fn read_number(&self, spec: &ParamSpec) -> u32 {
        let fallback = spec.default_number();
        match self.get(spec.name).map(|raw| raw.trim().parse::<u32>()) {
            Some(Ok(value)) if value >= 1 => value,
            Some(_) => {
                tracing::debug!(param = spec.name, fallback, "invalid numeric parameter");
                fallback
            }
            None => fallback,
        }
    }

    /// Apply all mutations at once and publish the result.
    ///
    /// Keys not named in `mutations` are untouched; existing keys keep their
    /// position, new keys are appended. Returns the new query string.
    pub fn write<I, K>(&mut self, mutations: I) -> String
    where
        I: IntoIterator<Item = (K, ParamMutation)>,
        K: Into<String>,
    {
        let mut next = self.params.clone();
        for (key, mutation) in mutations {
            let key = key.into();
            match mutation {
                ParamMutation::Set(value) => {
                    next.insert(key, value);
                }
                ParamMutation::Delete => {
                    next.shift_remove(&key);
                }
            }
        }
        self.params = next;
        self.revision += 1;
        self.to_query_string()
    }

    /// Shorthand for a write that only sets values.
    pub fn set_all<'a, I>(&mut self, values: I) -> String
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        self.write(values.into_iter().map(|(key, value)| (key, ParamMutation::Set(value))))
    }

    /// Number of published writes since this state was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Serialize back to a query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new()).extend_pairs(self.params.iter()).finish()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Typed parameters for the paged listing.
    pub fn home_params(&self) -> HomeParams {
        HomeParams {
            page: self.read_number(&PAGE),
            limit: self.read_number(&LIMIT),
            category: self.read_spec(&CATEGORY).unwrap_or_else(|| "all".to_string()),
            tab: Tab::parse(self.get(TAB.name).unwrap_or_default()),
        }
    }

    /// Typed parameters for the search screen.
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            text: self.read_spec(&SEARCH_TEXT),
            strength: self.read_spec(&STRENGTH),
            active_accordion: self.read_spec(&ACTIVE_ACCORDION),
        }
    }
}
