//! Application state shared by every storefront surface.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::services::auth::AccountService;
use crate::session::SessionStore;
use crate::storage::{FileStorage, Storage, StorageError};

/// Application state shared across all surfaces.
///
/// This struct is cheaply cloneable via `Arc`. Every clone sees the same
/// cart, session and storage, so a mutation made through one surface is
/// immediately visible to the others.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storage: Arc<dyn Storage>,
    cart: CartStore,
    session: SessionStore,
    accounts: AccountService,
    catalog: CatalogClient,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("data_dir", &self.inner.config.data_dir)
            .field("storage", &self.inner.storage)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Open the application state over the profile directory in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile directory cannot be created.
    pub fn open(config: StorefrontConfig) -> Result<Self, StorageError> {
        let storage = FileStorage::open(&config.data_dir)?;
        Ok(Self::with_storage(config, Arc::new(storage)))
    }

    /// Build the application state over an existing storage backend.
    ///
    /// The cart is hydrated from storage here.
    #[must_use]
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn Storage>) -> Self {
        let cart = CartStore::open_with_key(storage.clone(), config.cart_key.clone());
        let session = SessionStore::new(storage.clone());
        let accounts = AccountService::new(storage.clone(), session.clone());
        let catalog = CatalogClient::new(&config.catalog);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                cart,
                session,
                accounts,
                catalog,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the durable storage backend.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.inner.storage
    }

    /// Get a reference to the shared cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the login session.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Get a reference to the account service.
    #[must_use]
    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    /// Get a reference to the product catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }
}
