use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};

pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api/";

/// Tunables for the catalog client and the browsing session. The defaults are
/// what the application ships with; nothing here is read from disk or the
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub memory_cache_bytes: u64,
    pub disk_cache_bytes: u64,
    /// Hold each search until typing pauses this long. `None` dispatches one
    /// request per keystroke.
    pub search_debounce: Option<Duration>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            memory_cache_bytes: 100 * 1024 * 1024,
            disk_cache_bytes: 500 * 1024 * 1024,
            search_debounce: None,
        }
    }
}
