//! # Storefront Testing
//!
//! Testing utilities and helpers for storefront stores.
//!
//! This crate provides:
//! - A deterministic clock
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - [`effects::collect_actions`], which runs returned effects without a Store
//! - Tracing setup that writes through the test harness
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(CatalogReducer::new(settings))
//!     .with_env(test_environment())
//!     .given_state(CatalogState::default())
//!     .when_action(CatalogAction::LoadMore)
//!     .then_state(|state| assert_eq!(state.page_number, 2))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use storefront_core::environment::Clock;

/// Ergonomic reducer tests
pub mod reducer_test;

/// Mock implementations of core Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::FixedClock;
    /// use storefront_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which cannot happen.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Running effects outside of a Store
pub mod effects {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use storefront_core::effect::Effect;

    /// Execute an effect tree and collect every action it produces
    ///
    /// Futures and delays are awaited in place; parallel groups run in
    /// declaration order. Produced actions are returned, not reduced.
    pub fn collect_actions<A: Send + 'static>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>> {
        async move {
            match effect {
                Effect::None => Vec::new(),
                Effect::Future(fut) => fut.await.into_iter().collect(),
                Effect::Delay { duration, action } => {
                    tokio::time::sleep(duration).await;
                    vec![*action]
                },
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    let mut actions = Vec::new();
                    for effect in effects {
                        actions.extend(collect_actions(effect).await);
                    }
                    actions
                },
            }
        }
        .boxed()
    }

    /// Execute every effect of a reducer call and collect produced actions
    pub async fn collect_all<A, I>(effects: I) -> Vec<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(collect_actions(effect).await);
        }
        actions
    }
}

/// Route `tracing` output through the test harness
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{assertions, ReducerTest};
