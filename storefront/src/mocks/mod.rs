//! Mock implementations for testing.
//!
//! In-memory stand-ins for the backend and the navigator, used by unit and
//! integration tests and by the demo binary's offline mode.

pub mod api;
pub mod navigator;

pub use api::{ApiCall, Endpoint, MockStorefrontApi};
pub use navigator::RecordingNavigator;

use std::sync::Arc;

use storefront_api::MemoryTokenStore;
use storefront_core::environment::Clock;

use crate::environment::{StoreSettings, StorefrontEnvironment};

/// Environment wired to mocks, returned together with the handles tests
/// inspect.
#[derive(Debug, Clone)]
pub struct MockEnvironment {
    /// The environment to hand to stores.
    pub env: StorefrontEnvironment<MockStorefrontApi>,
    /// The backend behind `env.api`.
    pub api: MockStorefrontApi,
    /// The token store behind `env.tokens`.
    pub tokens: MemoryTokenStore,
    /// The navigator behind `env.navigator`.
    pub navigator: RecordingNavigator,
}

impl MockEnvironment {
    /// Wire `api` with an empty token store, a recording navigator and
    /// default settings.
    #[must_use]
    pub fn new(api: MockStorefrontApi, clock: Arc<dyn Clock>) -> Self {
        Self::with_settings(api, clock, StoreSettings::default())
    }

    /// Same as [`MockEnvironment::new`] with explicit settings.
    #[must_use]
    pub fn with_settings(
        api: MockStorefrontApi,
        clock: Arc<dyn Clock>,
        settings: StoreSettings,
    ) -> Self {
        let tokens = MemoryTokenStore::new();
        let navigator = RecordingNavigator::new();
        let env = StorefrontEnvironment::new(
            api.clone(),
            Arc::new(tokens.clone()),
            Arc::new(navigator.clone()),
            clock,
            settings,
        );

        Self {
            env,
            api,
            tokens,
            navigator,
        }
    }
}
