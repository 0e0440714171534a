//! Catalog header store: the category menu with nested sub-categories.

use std::marker::PhantomData;

use storefront_api::{Category, StorefrontApi};
use storefront_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_macros::Action;

use crate::environment::StorefrontEnvironment;

/// Header menu state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderState {
    /// Category tree
    pub categories: Vec<Category>,
    /// Fetch in flight
    pub loading: bool,
    /// Tree fetched at least once
    pub loaded: bool,
}

/// Header menu actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum HeaderAction {
    /// Fetch the category tree unless it is already here
    #[command]
    LoadCatalog,

    /// Category tree arrived; empty on failure
    #[event]
    CatalogLoaded {
        /// Categories with nested sub-categories
        categories: Vec<Category>,
    },
}

/// Header menu reducer
#[derive(Debug, Clone)]
pub struct HeaderReducer<B> {
    _phantom: PhantomData<B>,
}

impl<B> HeaderReducer<B> {
    /// Create a new header reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<B> Default for HeaderReducer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> Reducer for HeaderReducer<B>
where
    B: StorefrontApi + Clone + 'static,
{
    type State = HeaderState;
    type Action = HeaderAction;
    type Environment = StorefrontEnvironment<B>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            HeaderAction::LoadCatalog => {
                if state.loaded || state.loading {
                    return SmallVec::new();
                }
                state.loading = true;

                let api = env.api.clone();
                smallvec![async_effect! {
                    let categories = api.category_tree().await.unwrap_or_else(|error| {
                        tracing::warn!(%error, "Failed to load category tree");
                        Vec::new()
                    });
                    Some(HeaderAction::CatalogLoaded { categories })
                }]
            },

            HeaderAction::CatalogLoaded { categories } => {
                state.categories = categories;
                state.loading = false;
                state.loaded = true;
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storefront_api::ApiError;
    use storefront_testing::{assertions, effects::collect_all, test_clock, ReducerTest};

    use crate::mocks::{Endpoint, MockEnvironment, MockStorefrontApi};

    #[test]
    fn test_loads_only_once() {
        let mock = MockEnvironment::new(MockStorefrontApi::default(), Arc::new(test_clock()));

        ReducerTest::new(HeaderReducer::new())
            .with_env(mock.env)
            .given_state(HeaderState {
                loaded: true,
                ..HeaderState::default()
            })
            .when_action(HeaderAction::LoadCatalog)
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn test_tree_has_nested_sub_categories() {
        let mock =
            MockEnvironment::new(MockStorefrontApi::with_sample_catalog(), Arc::new(test_clock()));
        let reducer = HeaderReducer::<MockStorefrontApi>::new();
        let mut state = HeaderState::default();

        let effects = reducer.reduce(&mut state, HeaderAction::LoadCatalog, &mock.env);
        assert!(state.loading);
        for action in collect_all(effects).await {
            let _ = reducer.reduce(&mut state, action, &mock.env);
        }

        assert!(state.loaded);
        assert_eq!(state.categories.len(), 2);
        assert_eq!(state.categories[0].sub_categories.len(), 2);
        assert_eq!(state.categories[1].sub_categories[0].name, "Flip");
    }

    #[tokio::test]
    async fn test_failure_gives_empty_tree() {
        let api = MockStorefrontApi::with_sample_catalog();
        api.fail(Endpoint::CategoryTree, ApiError::Transport("down".to_string()));
        let mock = MockEnvironment::new(api, Arc::new(test_clock()));
        let reducer = HeaderReducer::<MockStorefrontApi>::new();
        let mut state = HeaderState::default();

        let effects = reducer.reduce(&mut state, HeaderAction::LoadCatalog, &mock.env);
        for action in collect_all(effects).await {
            let _ = reducer.reduce(&mut state, action, &mock.env);
        }

        assert!(state.categories.is_empty());
        assert!(!state.loading);
    }
}
