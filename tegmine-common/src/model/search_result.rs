use serde::{Deserialize, Serialize};

/// One page of a search over workflow executions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult<T> {
    pub total_hits: i64,
    pub results: Vec<T>,
}

impl<T> Default for SearchResult<T> {
    fn default() -> Self {
        Self {
            total_hits: 0,
            results: Vec::new(),
        }
    }
}
