//! Token search over the catalog.
//!
//! A track is visible when its search key contains every query token. The
//! whole catalog is re-evaluated on each query change.

use super::catalog::Catalog;
use super::model::Track;
use super::normalize::normalize;

#[derive(Debug, Default, Clone)]
pub struct SearchFilter {
    query: String,
    tokens: Vec<String>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the query text and recompute its tokens.
    pub fn set_query(&mut self, text: &str) {
        self.query = text.to_string();
        self.tokens = normalize(text)
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// The query as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn accepts(&self, track: &Track) -> bool {
        if self.tokens.is_empty() || track.search_key.is_empty() {
            return true;
        }
        self.tokens.iter().all(|t| track.search_key.contains(t.as_str()))
    }

    /// Catalog indices of accepted tracks, in catalog order.
    pub fn visible(&self, catalog: &Catalog) -> Vec<usize> {
        catalog
            .tracks()
            .iter()
            .enumerate()
            .filter(|(_, t)| self.accepts(t))
            .map(|(i, _)| i)
            .collect()
    }
}
