use std::fmt;

/// Canonical tuple of everything that affects a fetch's result.
///
/// The first part is the domain tag (`"heroes"`, `"summary-information"`, ...);
/// the rest are the semantic parameters in a fixed order. Two equal keys are
/// interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(Vec<String>);

impl CacheKey {
    pub fn new(domain: impl Into<String>) -> Self {
        Self(vec![domain.into()])
    }

    /// Append one parameter to the key.
    pub fn with(mut self, part: impl ToString) -> Self {
        self.0.push(part.to_string());
        self
    }

    /// Append an optional parameter; absence is encoded distinctly from an empty string.
    pub fn with_opt(self, part: Option<&str>) -> Self {
        match part {
            Some(value) => self.with(format!("={value}")),
            None => self.with("-"),
        }
    }

    pub fn domain(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}
