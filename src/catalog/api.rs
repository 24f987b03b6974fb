use std::{
    path::PathBuf,
    sync::Arc,
};

use async_trait::async_trait;
use reqwest::{
    Client,
    Url,
};

use super::types::{
    Character,
    PageEnvelope,
};
use crate::core::{
    cache::ResponseCache,
    config::CatalogConfig,
    errors::RickdexError,
};

/// Read operations against the remote character catalog.
///
/// Implementations must never block the caller. The session only ever talks
/// to this trait, so tests substitute a scripted double for the network.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Lists one page of the full catalog. An empty page means the catalog
    /// has no further pages.
    async fn list_page(&self, page: u32) -> Result<Vec<Character>, RickdexError>;

    /// Lists one page of the catalog filtered by name substring. An empty
    /// `name` resolves to an empty page without touching the network. The
    /// remote answers a no-match query with a non-2xx status, so "nothing
    /// matched" arrives as an error rather than an empty page.
    async fn list_page_by_name(
        &self,
        name: &str,
        page: u32,
    ) -> Result<Vec<Character>, RickdexError>;

    /// Drops any cached responses. Implementations without a cache keep the
    /// default no-op.
    fn clear_cache(&self) {}
}

pub struct HttpCatalog {
    client: Client,
    base_url: Url,
    cache: Arc<ResponseCache>,
}

impl HttpCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self, RickdexError> {
        Self::with_cache_dir(config, default_cache_dir())
    }

    pub fn with_cache_dir(
        config: &CatalogConfig,
        cache_dir: Option<PathBuf>,
    ) -> Result<Self, RickdexError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let cache = Arc::new(ResponseCache::new(
            config.memory_cache_bytes,
            config.disk_cache_bytes,
            cache_dir,
        ));

        Ok(Self { client, base_url: Url::parse(&config.base_url)?, cache })
    }

    fn character_endpoint(&self, params: &[(&str, String)]) -> Result<Url, RickdexError> {
        let mut url = self.base_url.join("character/")?;
        url.query_pairs_mut().extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())));
        Ok(url)
    }

    async fn fetch_characters(&self, url: Url) -> Result<Vec<Character>, RickdexError> {
        let key = url.to_string();

        if let Some(body) = self.cache.get(&key) {
            tracing::debug!("serving {key} from the response cache");
            return decode_page(&body);
        }

        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        let characters = decode_page(&body)?;

        // Only bodies that decode are worth keeping.
        self.cache.put(key, body.to_vec());

        Ok(characters)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn list_page(&self, page: u32) -> Result<Vec<Character>, RickdexError> {
        let url = self.character_endpoint(&[("page", page.to_string())])?;
        self.fetch_characters(url).await
    }

    async fn list_page_by_name(
        &self,
        name: &str,
        page: u32,
    ) -> Result<Vec<Character>, RickdexError> {
        if name.is_empty() {
            return Ok(Vec::new());
        }

        let url = self
            .character_endpoint(&[("name", name.to_string()), ("page", page.to_string())])?;
        self.fetch_characters(url).await
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn decode_page(body: &[u8]) -> Result<Vec<Character>, RickdexError> {
    let envelope: PageEnvelope = serde_json::from_slice(body)?;
    Ok(envelope.results)
}

fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("rickdex").join("http"))
}
