//! Product catalog client.
//!
//! Searches the demo product API (`/products/search`) by category term.
//! Only products with a thumbnail and a description are listed. Results are
//! cached per term using `moka` (5-minute TTL by default).
//!
//! # Example
//!
//! ```rust,ignore
//! use techstore_storefront::catalog::CatalogClient;
//!
//! let catalog = CatalogClient::new(&config.catalog);
//! let phones = catalog.search("phone").await?;
//! cart.add_item(&phones[0].to_cart_value()?)?;
//! ```

mod types;

pub use types::{CATEGORIES, Category, DEFAULT_TERM, MAX_STARS, Product};

use std::sync::Arc;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogConfig;

use types::SearchResponse;

/// Errors that can occur when querying the product API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("product API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry a path.
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the product API.
///
/// Cheap to clone; clones share the HTTP client and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    page_size: u32,
    cache: Cache<String, Arc<Vec<Product>>>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("page_size", &self.inner.page_size)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                page_size: config.page_size,
                cache,
            }),
        }
    }

    /// Categories offered by the store.
    #[must_use]
    pub const fn categories(&self) -> &'static [Category] {
        &CATEGORIES
    }

    /// Search listable products by term.
    ///
    /// An empty term searches [`DEFAULT_TERM`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a
    /// non-success status, or the body is not a search response.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<Product>, CatalogError> {
        let term = match term.trim() {
            "" => DEFAULT_TERM.to_string(),
            t => t.to_lowercase(),
        };

        if let Some(products) = self.inner.cache.get(&term).await {
            debug!("Cache hit for search");
            return Ok(products.as_ref().clone());
        }

        let url = self.search_url(&term)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Product API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let response: SearchResponse = serde_json::from_str(&body).inspect_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse product search response"
            );
        })?;

        let products: Vec<Product> = response
            .products
            .into_iter()
            .filter(Product::is_listable)
            .collect();
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(term, Arc::new(products.clone()))
            .await;

        Ok(products)
    }

    /// Find a listable product of a search by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the search fails.
    pub async fn find(&self, term: &str, id: i64) -> Result<Option<Product>, CatalogError> {
        Ok(self.search(term).await?.into_iter().find(|p| p.id == id))
    }

    /// Drop all cached searches.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate_all();
    }

    fn search_url(&self, term: &str) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(["products", "search"]);
        url.query_pairs_mut()
            .clear()
            .append_pair("q", term)
            .append_pair("limit", &self.inner.page_size.to_string());
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `body` with `status` to every connection, counting requests.
    async fn serve(status: u16, body: &'static str) -> (Url, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = vec![0_u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {status} X\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (Url::parse(&format!("http://{addr}")).unwrap(), hits)
    }

    fn client(base_url: Url) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            base_url,
            page_size: 8,
            cache_ttl: Duration::from_secs(300),
        })
    }

    const SEARCH_BODY: &str = r#"{
        "products": [
            {"id": 1, "title": "iPhone 9", "description": "Phone", "price": 549,
             "thumbnail": "https://cdn.example.com/1.jpg", "rating": 4.7},
            {"id": 2, "title": "No picture", "description": "Hidden", "price": 10},
            {"id": 3, "title": "No text", "thumbnail": "https://cdn.example.com/3.jpg", "price": 5}
        ],
        "total": 3, "skip": 0, "limit": 8
    }"#;

    #[test]
    fn test_search_url() {
        let catalog = client(Url::parse("https://dummyjson.com").unwrap());
        assert_eq!(
            catalog.search_url("phone").unwrap().as_str(),
            "https://dummyjson.com/products/search?q=phone&limit=8"
        );

        let catalog = client(Url::parse("http://localhost:9000/api/").unwrap());
        assert_eq!(
            catalog.search_url("smart watch").unwrap().as_str(),
            "http://localhost:9000/api/products/search?q=smart+watch&limit=8"
        );
    }

    #[test]
    fn test_categories() {
        let catalog = client(Url::parse("https://dummyjson.com").unwrap());
        let terms: Vec<_> = catalog.categories().iter().map(|c| c.term).collect();
        assert_eq!(terms, ["phone", "laptop", "monitor", "tablet", "camera"]);
    }

    #[tokio::test]
    async fn test_search_filters_and_caches() {
        let (base_url, hits) = serve(200, SEARCH_BODY).await;
        let catalog = client(base_url);

        let products = catalog.search("Phone").await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, 1);

        // Same term (case-insensitive) is served from cache
        let again = catalog.search("phone").await.unwrap();
        assert_eq!(again, products);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert_eq!(catalog.find("phone", 1).await.unwrap().unwrap().title, "iPhone 9");
        assert!(catalog.find("phone", 2).await.unwrap().is_none());

        catalog.invalidate();
        catalog.search("phone").await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_search_non_success_status() {
        let (base_url, _) = serve(500, r#"{"message":"boom"}"#).await;
        let catalog = client(base_url);

        let err = catalog.search("laptop").await.unwrap_err();
        assert!(matches!(err, CatalogError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_search_bad_body() {
        let (base_url, _) = serve(200, "not json").await;
        let catalog = client(base_url);

        assert!(matches!(
            catalog.search("tablet").await,
            Err(CatalogError::Parse(_))
        ));
    }
}
