//! Application context.
//!
//! [`Storefront`] owns one store per feature over a single shared
//! environment. The presentation layer receives it instead of reaching for
//! global state.

use std::sync::Arc;
use std::time::Duration;

use storefront_api::{
    ApiClient, ApiError, FileTokenStore, MemoryTokenStore, ProductId, StorefrontApi, TokenStore,
};
use storefront_core::environment::SystemClock;
use storefront_runtime::{EffectHandle, Store, StoreError};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::environment::StorefrontEnvironment;
use crate::navigation::{Navigator, RedirectToLogin};
use crate::stores::{
    AuthAction, AuthReducer, AuthState, CartAction, CartReducer, CartState, CatalogAction,
    CatalogReducer, CatalogState, HeaderAction, HeaderReducer, HeaderState, HomeAction,
    HomeReducer, HomeState, ProfileAction, ProfileReducer, ProfileState,
};

/// Catalog store over backend `B`
pub type CatalogStore<B> =
    Store<CatalogState, CatalogAction, StorefrontEnvironment<B>, CatalogReducer<B>>;
/// Cart store over backend `B`
pub type CartStore<B> = Store<CartState, CartAction, StorefrontEnvironment<B>, CartReducer<B>>;
/// Landing page store over backend `B`
pub type HomeStore<B> = Store<HomeState, HomeAction, StorefrontEnvironment<B>, HomeReducer<B>>;
/// Auth store over backend `B`
pub type AuthStore<B> = Store<AuthState, AuthAction, StorefrontEnvironment<B>, AuthReducer<B>>;
/// Header menu store over backend `B`
pub type HeaderStore<B> =
    Store<HeaderState, HeaderAction, StorefrontEnvironment<B>, HeaderReducer<B>>;
/// Profile store over backend `B`
pub type ProfileStore<B> =
    Store<ProfileState, ProfileAction, StorefrontEnvironment<B>, ProfileReducer<B>>;

/// Errors raised while wiring the application
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client could not be built
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Every feature store, sharing one environment
#[derive(Clone)]
pub struct Storefront<B>
where
    B: StorefrontApi + Clone + 'static,
{
    env: StorefrontEnvironment<B>,
    catalog: CatalogStore<B>,
    cart: CartStore<B>,
    home: HomeStore<B>,
    auth: AuthStore<B>,
    header: HeaderStore<B>,
    profile: ProfileStore<B>,
}

impl<B> Storefront<B>
where
    B: StorefrontApi + Clone + 'static,
{
    /// Build every store over `env`
    ///
    /// The auth store starts signed in when the token store already holds a
    /// token.
    #[must_use]
    pub fn new(env: StorefrontEnvironment<B>) -> Self {
        let settings = env.settings;
        let signed_in = env.tokens.load().is_some();

        Self {
            catalog: Store::new(
                CatalogState::new(settings.catalog_page_size),
                CatalogReducer::new(),
                env.clone(),
            ),
            cart: Store::new(CartState::default(), CartReducer::new(), env.clone()),
            home: Store::new(
                HomeState::new(settings.home_page_size),
                HomeReducer::new(),
                env.clone(),
            ),
            auth: Store::new(AuthState::new(signed_in), AuthReducer::new(), env.clone()),
            header: Store::new(HeaderState::default(), HeaderReducer::new(), env.clone()),
            profile: Store::new(ProfileState::default(), ProfileReducer::new(), env.clone()),
            env,
        }
    }

    /// Shared environment
    #[must_use]
    pub const fn environment(&self) -> &StorefrontEnvironment<B> {
        &self.env
    }

    /// Catalog store
    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore<B> {
        &self.catalog
    }

    /// Cart store
    #[must_use]
    pub const fn cart(&self) -> &CartStore<B> {
        &self.cart
    }

    /// Landing page store
    #[must_use]
    pub const fn home(&self) -> &HomeStore<B> {
        &self.home
    }

    /// Auth store
    #[must_use]
    pub const fn auth(&self) -> &AuthStore<B> {
        &self.auth
    }

    /// Header menu store
    #[must_use]
    pub const fn header(&self) -> &HeaderStore<B> {
        &self.header
    }

    /// Profile store
    #[must_use]
    pub const fn profile(&self) -> &ProfileStore<B> {
        &self.profile
    }

    /// The "add to cart" button: flags the product in the catalog right away,
    /// then adds it to the backend cart
    ///
    /// Returns the cart's handle; waiting on it covers the add and the
    /// re-fetch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`Storefront::shutdown`].
    pub async fn add_to_cart(&self, product_id: ProductId) -> Result<EffectHandle, StoreError> {
        self.catalog
            .send(CatalogAction::MarkInCart { product_id })
            .await?;
        self.cart.send(CartAction::AddProduct { product_id }).await
    }

    /// Shut every store down, waiting up to `timeout` for each
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError::ShutdownTimeout`]; the remaining
    /// stores are still shut down.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        let results = [
            self.catalog.shutdown(timeout).await,
            self.cart.shutdown(timeout).await,
            self.home.shutdown(timeout).await,
            self.auth.shutdown(timeout).await,
            self.header.shutdown(timeout).await,
            self.profile.shutdown(timeout).await,
        ];
        results.into_iter().collect()
    }
}

impl Storefront<ApiClient> {
    /// Wire the stores to the HTTP backend described by `config`
    ///
    /// The token lives in a file under `config.token_dir` when set, in memory
    /// otherwise. A 401 from any endpoint sends the user to the login page
    /// through `navigator`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] for an invalid configuration and
    /// [`AppError::Api`] when the HTTP client cannot be built.
    pub fn connect(config: &Config, navigator: Arc<dyn Navigator>) -> Result<Self, AppError> {
        config.validate()?;

        let tokens: Arc<dyn TokenStore> = match &config.token_dir {
            Some(dir) => Arc::new(FileTokenStore::new(dir)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        let api = ApiClient::new(
            &config.api_url,
            config.request_timeout,
            Arc::clone(&tokens),
            Arc::new(RedirectToLogin::new(Arc::clone(&navigator))),
        )?;
        tracing::info!(api_url = %api.base_url(), "Connected storefront");

        Ok(Self::new(StorefrontEnvironment::new(
            api,
            tokens,
            navigator,
            Arc::new(SystemClock),
            config.settings(),
        )))
    }
}

impl<B> std::fmt::Debug for Storefront<B>
where
    B: StorefrontApi + Clone + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_testing::test_clock;

    use crate::mocks::{MockEnvironment, MockStorefrontApi};
    use crate::navigation::TracingNavigator;

    #[tokio::test]
    async fn test_auth_starts_signed_in_with_stored_token() {
        let mock = MockEnvironment::new(MockStorefrontApi::default(), Arc::new(test_clock()));
        mock.tokens.save("token-alice").unwrap();

        let app = Storefront::new(mock.env);

        assert!(app.auth().state(|s| s.signed_in).await);
    }

    #[tokio::test]
    async fn test_page_sizes_come_from_settings() {
        let mock = MockEnvironment::new(MockStorefrontApi::default(), Arc::new(test_clock()));

        let app = Storefront::new(mock.env);

        assert_eq!(app.catalog().state(|s| s.page_size).await, 10);
        assert_eq!(app.home().state(|s| s.page_size).await, 8);
        assert!(!app.auth().state(|s| s.signed_in).await);
    }

    #[test]
    fn test_connect_rejects_invalid_config() {
        let config = Config {
            catalog_page_size: 0,
            ..Config::default()
        };

        let result = Storefront::connect(&config, Arc::new(TracingNavigator));

        assert!(matches!(result, Err(AppError::Config(ConfigError::ZeroValue(_)))));
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() {
        let mock = MockEnvironment::new(MockStorefrontApi::default(), Arc::new(test_clock()));
        let app = Storefront::new(mock.env);

        app.shutdown(Duration::from_secs(1)).await.unwrap();

        let result = app.cart().send(CartAction::GetProductsFromCart).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
    }
}
