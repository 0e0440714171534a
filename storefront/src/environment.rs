//! Storefront environment.
//!
//! Everything a store reducer needs from the outside world, injected so each
//! store runs against the real backend or in-memory doubles.

use std::sync::Arc;
use std::time::Duration;

use storefront_api::{StorefrontApi, TokenStore};
use storefront_core::environment::Clock;

use crate::navigation::Navigator;

/// Store tuning knobs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreSettings {
    /// Products per catalog page
    pub catalog_page_size: u32,
    /// Products on the landing page before any "load more"
    pub home_page_size: u32,
    /// How much each landing page "load more" grows the page
    pub home_page_step: u32,
    /// Quiet period before a live search is sent
    pub search_debounce: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            catalog_page_size: 10,
            home_page_size: 8,
            home_page_step: 8,
            search_debounce: Duration::from_millis(500),
        }
    }
}

/// Storefront environment.
///
/// # Type Parameters
///
/// - `B`: backend implementation ([`storefront_api::ApiClient`] in production)
#[derive(Clone)]
pub struct StorefrontEnvironment<B>
where
    B: StorefrontApi + Clone,
{
    /// Storefront backend.
    pub api: B,

    /// Bearer token storage, shared with the HTTP client.
    pub tokens: Arc<dyn TokenStore>,

    /// Full-page navigation.
    pub navigator: Arc<dyn Navigator>,

    /// Clock for order timestamps.
    pub clock: Arc<dyn Clock>,

    /// Page sizes and debounce.
    pub settings: StoreSettings,
}

impl<B> StorefrontEnvironment<B>
where
    B: StorefrontApi + Clone,
{
    /// Create a new storefront environment.
    #[must_use]
    pub fn new(
        api: B,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
        settings: StoreSettings,
    ) -> Self {
        Self {
            api,
            tokens,
            navigator,
            clock,
            settings,
        }
    }
}

impl<B> std::fmt::Debug for StorefrontEnvironment<B>
where
    B: StorefrontApi + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontEnvironment")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
