//! Landing page store.
//!
//! The landing page shows the first `page_size` products. "Load more" grows
//! the page size and re-fetches the whole, larger page from offset zero, so
//! the list is always replaced, never appended.

use std::marker::PhantomData;

use storefront_api::{Product, StorefrontApi};
use storefront_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_macros::Action;

use crate::environment::StorefrontEnvironment;

/// Landing page state
#[derive(Clone, Debug, PartialEq)]
pub struct HomeState {
    /// Products shown
    pub products: Vec<Product>,
    /// How many products the next fetch asks for
    pub page_size: u32,
    /// First fetch in flight
    pub loading: bool,
    /// Re-fetch after "load more" in flight
    pub loading_more: bool,
}

impl HomeState {
    /// Empty landing page
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            products: Vec::new(),
            page_size,
            loading: false,
            loading_more: false,
        }
    }
}

impl Default for HomeState {
    fn default() -> Self {
        Self::new(8)
    }
}

/// Landing page actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum HomeAction {
    /// Fetch the first `page_size` products
    #[command]
    GetProducts,

    /// Grow the page and fetch it again
    #[command]
    LoadMore,

    /// Products arrived; empty when the fetch failed
    #[event]
    ProductsLoaded {
        /// Products, replacing the current list
        products: Vec<Product>,
    },
}

/// Landing page reducer
#[derive(Debug, Clone)]
pub struct HomeReducer<B> {
    _phantom: PhantomData<B>,
}

impl<B> HomeReducer<B> {
    /// Create a new landing page reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<B> Default for HomeReducer<B> {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch<B>(api: B, page_size: u32) -> Effect<HomeAction>
where
    B: StorefrontApi + 'static,
{
    async_effect! {
        let products = api.home_products(page_size).await.unwrap_or_else(|error| {
            tracing::warn!(%error, page_size, "Failed to load landing page products");
            Vec::new()
        });
        Some(HomeAction::ProductsLoaded { products })
    }
}

impl<B> Reducer for HomeReducer<B>
where
    B: StorefrontApi + Clone + 'static,
{
    type State = HomeState;
    type Action = HomeAction;
    type Environment = StorefrontEnvironment<B>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            HomeAction::GetProducts => {
                state.loading = true;
                smallvec![fetch(env.api.clone(), state.page_size)]
            },

            HomeAction::LoadMore => {
                state.page_size = state.page_size.saturating_add(env.settings.home_page_step);
                state.loading_more = true;
                smallvec![fetch(env.api.clone(), state.page_size)]
            },

            HomeAction::ProductsLoaded { products } => {
                state.products = products;
                state.loading = false;
                state.loading_more = false;
                SmallVec::new()
            },
        }
    }
}
