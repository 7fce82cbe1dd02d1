//! Admin REST API client.
//!
//! Talks to the demo administration API (`/users`, `/products`). Data is
//! not cached: the dashboard always shows what the API holds.
//!
//! # Example
//!
//! ```rust,ignore
//! use techstore_admin::{AdminClient, filter_and_paginate};
//!
//! let client = AdminClient::new(&config);
//! let users = client.list_users().await?;
//! let page = filter_and_paginate(&users, "maria", 1);
//! ```

mod types;

pub use types::{
    AdminCategory, AdminProduct, AdminUser, DEFAULT_CATEGORY, PLACEHOLDER_IMAGE, ProductDraft,
};

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use url::Url;

use techstore_core::ProductId;

use crate::config::AdminConfig;
use crate::error::AdminError;

// =============================================================================
// AdminClient
// =============================================================================

/// Client for the admin REST API.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Create a new admin API client.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                token: config.api_token.clone(),
            }),
        }
    }

    /// Build the URL of a resource path below the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, AdminError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AdminError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match &self.inner.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and check the response status.
    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, AdminError> {
        let response = builder.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(AdminError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(AdminError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Admin API returned non-success status"
            );
            return Err(AdminError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(response)
    }

    /// Send a request and parse the JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> Result<T, AdminError> {
        let response = self.send(builder, what).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse admin API response"
            );
            AdminError::Parse(e)
        })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<AdminUser>, AdminError> {
        let url = self.url(&["users"])?;
        let users: Vec<AdminUser> = self.send_json(self.request(Method::GET, url), "users").await?;
        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<AdminProduct>, AdminError> {
        let url = self.url(&["products"])?;
        let products: Vec<AdminProduct> = self
            .send_json(self.request(Method::GET, url), "products")
            .await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<AdminProduct, AdminError> {
        let url = self.url(&["products", &id.to_string()])?;
        self.send_json(self.request(Method::GET, url), &format!("product {id}"))
            .await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::InvalidDraft` if the draft is rejected locally,
    /// or an error if the API request fails.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<AdminProduct, AdminError> {
        draft.validate()?;
        let url = self.url(&["products"])?;
        let product: AdminProduct = self
            .send_json(self.request(Method::POST, url).json(draft), "products")
            .await?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::InvalidDraft` if the draft is rejected locally,
    /// `AdminError::NotFound` if the product does not exist, or an error if
    /// the API request fails.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<AdminProduct, AdminError> {
        draft.validate()?;
        let url = self.url(&["products", &id.to_string()])?;
        let product: AdminProduct = self
            .send_json(
                self.request(Method::PUT, url).json(draft),
                &format!("product {id}"),
            )
            .await?;
        info!("Product updated");
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), AdminError> {
        let url = self.url(&["products", &id.to_string()])?;
        self.send(self.request(Method::DELETE, url), &format!("product {id}"))
            .await?;
        info!("Product deleted");
        Ok(())
    }
}
