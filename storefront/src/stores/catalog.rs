//! Product catalog store.
//!
//! Owns the paginated, filtered product listing, the facet lists (brands,
//! categories, sub-categories) and the header's live search results.
//!
//! Pagination is client-driven: `LoadMore` only advances `page_number`, and a
//! following `GetProducts { load_more: true }` appends the page. Changing the
//! filter goes through `ResetPage`, which rewinds to page 1 and clears the
//! list. `has_more` is a heuristic: a page shorter than `page_size` ends the
//! listing.

use std::marker::PhantomData;

use storefront_api::{
    Brand, Category, PriceRange, Product, ProductFilter, ProductId, ProductPage, ProductQuery,
    StorefrontApi, SubCategory,
};
use storefront_core::{async_effect, delay, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_macros::Action;

use crate::environment::StorefrontEnvironment;

/// Catalog state
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogState {
    /// Accumulated catalog listing
    pub products: Vec<Product>,
    /// Header live search results
    pub search_results: Vec<Product>,
    /// Brand facet
    pub brands: Vec<Brand>,
    /// Category facet
    pub categories: Vec<Category>,
    /// Sub-category facet
    pub sub_categories: Vec<SubCategory>,
    /// Price bounds of the last filtered page
    pub price_range: Option<PriceRange>,
    /// 1-based page the next fetch asks for
    pub page_number: u32,
    /// Products per page
    pub page_size: u32,
    /// Whether another page may exist
    pub has_more: bool,
    /// Filter of the last fetch
    pub active_filter: ProductFilter,
    /// Initial page load in flight
    pub loading: bool,
    /// Appending page load in flight
    pub loading_more: bool,
    /// Live search in flight
    pub search_loading: bool,
    /// Latest live search text
    pub search_text: String,
    /// Bumped on every keystroke; only the latest debounce fires a search
    pub search_generation: u64,
}

impl CatalogState {
    /// Empty catalog on page 1
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            products: Vec::new(),
            search_results: Vec::new(),
            brands: Vec::new(),
            categories: Vec::new(),
            sub_categories: Vec::new(),
            price_range: None,
            page_number: 1,
            page_size,
            has_more: true,
            active_filter: ProductFilter::default(),
            loading: false,
            loading_more: false,
            search_loading: false,
            search_text: String::new(),
            search_generation: 0,
        }
    }

    /// True while any listing request is in flight
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.loading || self.loading_more
    }

    fn reset_page(&mut self) {
        self.page_number = 1;
        self.products.clear();
        self.has_more = true;
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Catalog actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum CatalogAction {
    // ========== Commands ==========
    /// Fetch the current page for `filter`; append when `load_more`
    #[command]
    GetProducts {
        /// Filter to apply
        filter: ProductFilter,
        /// Append instead of replace
        load_more: bool,
    },

    /// Advance to the next page without fetching
    #[command]
    LoadMore,

    /// Back to page 1 with an empty listing
    #[command]
    ResetPage,

    /// Fetch the brand facet
    #[command]
    GetBrands,

    /// Fetch the category facet
    #[command]
    GetCategories,

    /// Fetch the sub-category facet
    #[command]
    GetSubCategories,

    /// Run a live search right away
    #[command]
    SetSearchProducts {
        /// Name to search for
        search: String,
    },

    /// Filter changed: reset and fetch page 1
    #[command]
    ApplyFilter {
        /// New filter
        filter: ProductFilter,
    },

    /// Infinite scroll reached the end of the list
    #[command]
    LoadNextPage,

    /// The search box changed; searches after the debounce period
    #[command]
    SearchTextChanged {
        /// Current search box text
        text: String,
    },

    /// Flag a product as in the cart before the next fetch confirms it
    #[command]
    MarkInCart {
        /// Product added to the cart
        product_id: ProductId,
    },

    // ========== Events ==========
    /// A listing page arrived
    #[event]
    ProductsLoaded {
        /// The page
        page: ProductPage,
        /// Whether it extends the listing
        load_more: bool,
    },

    /// A listing request failed
    #[event]
    ProductsFailed {
        /// Error message
        error: String,
    },

    /// Brand facet arrived
    #[event]
    BrandsLoaded {
        /// Brands, empty on failure
        brands: Vec<Brand>,
    },

    /// Category facet arrived
    #[event]
    CategoriesLoaded {
        /// Categories, empty on failure
        categories: Vec<Category>,
    },

    /// Sub-category facet arrived
    #[event]
    SubCategoriesLoaded {
        /// Sub-categories, empty on failure
        sub_categories: Vec<SubCategory>,
    },

    /// The debounce period for a keystroke ended
    #[event]
    SearchDebounceElapsed {
        /// Generation of the keystroke that scheduled it
        generation: u64,
    },

    /// Live search results arrived
    #[event]
    SearchResultsLoaded {
        /// Matches, empty on failure
        products: Vec<Product>,
    },
}

/// Catalog reducer
#[derive(Debug, Clone)]
pub struct CatalogReducer<B> {
    _phantom: PhantomData<B>,
}

impl<B> CatalogReducer<B> {
    /// Create a new catalog reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<B> Default for CatalogReducer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> CatalogReducer<B>
where
    B: StorefrontApi + Clone + 'static,
{
    fn fetch_products(
        state: &mut CatalogState,
        filter: ProductFilter,
        load_more: bool,
        env: &StorefrontEnvironment<B>,
    ) -> Effect<CatalogAction> {
        if load_more {
            state.loading_more = true;
        } else {
            state.loading = true;
        }
        state.active_filter = filter.clone();

        let query = ProductQuery {
            filter,
            page_number: state.page_number,
            page_size: state.page_size,
        };
        let api = env.api.clone();

        async_effect! {
            match api.filtered_products(&query).await {
                Ok(page) => Some(CatalogAction::ProductsLoaded { page, load_more }),
                Err(error) => {
                    tracing::warn!(%error, page = query.page_number, "Failed to load products");
                    Some(CatalogAction::ProductsFailed { error: error.to_string() })
                },
            }
        }
    }

    fn search(
        state: &mut CatalogState,
        search: String,
        env: &StorefrontEnvironment<B>,
    ) -> Effect<CatalogAction> {
        state.search_loading = true;
        let api = env.api.clone();

        async_effect! {
            let products = api.search_products(&search).await.unwrap_or_else(|error| {
                tracing::warn!(%error, %search, "Live search failed");
                Vec::new()
            });
            Some(CatalogAction::SearchResultsLoaded { products })
        }
    }
}

impl<B> Reducer for CatalogReducer<B>
where
    B: StorefrontApi + Clone + 'static,
{
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = StorefrontEnvironment<B>;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            CatalogAction::GetProducts { filter, load_more } => {
                smallvec![Self::fetch_products(state, filter, load_more, env)]
            },

            CatalogAction::LoadMore => {
                state.page_number += 1;
                SmallVec::new()
            },

            CatalogAction::ResetPage => {
                state.reset_page();
                SmallVec::new()
            },

            CatalogAction::ApplyFilter { filter } => {
                state.reset_page();
                smallvec![Self::fetch_products(state, filter, false, env)]
            },

            CatalogAction::LoadNextPage => {
                if !state.has_more || state.is_fetching() {
                    tracing::debug!(
                        has_more = state.has_more,
                        fetching = state.is_fetching(),
                        "Skipping next page"
                    );
                    return SmallVec::new();
                }
                state.page_number += 1;
                let filter = state.active_filter.clone();
                smallvec![Self::fetch_products(state, filter, true, env)]
            },

            CatalogAction::GetBrands => {
                let api = env.api.clone();
                smallvec![async_effect! {
                    let brands = api.brands().await.unwrap_or_else(|error| {
                        tracing::warn!(%error, "Failed to load brands");
                        Vec::new()
                    });
                    Some(CatalogAction::BrandsLoaded { brands })
                }]
            },

            CatalogAction::GetCategories => {
                let api = env.api.clone();
                smallvec![async_effect! {
                    let categories = api.categories().await.unwrap_or_else(|error| {
                        tracing::warn!(%error, "Failed to load categories");
                        Vec::new()
                    });
                    Some(CatalogAction::CategoriesLoaded { categories })
                }]
            },

            CatalogAction::GetSubCategories => {
                let api = env.api.clone();
                smallvec![async_effect! {
                    let sub_categories = api.sub_categories().await.unwrap_or_else(|error| {
                        tracing::warn!(%error, "Failed to load sub-categories");
                        Vec::new()
                    });
                    Some(CatalogAction::SubCategoriesLoaded { sub_categories })
                }]
            },

            CatalogAction::SetSearchProducts { search } => {
                smallvec![Self::search(state, search, env)]
            },

            CatalogAction::SearchTextChanged { text } => {
                state.search_generation += 1;
                state.search_text = text;

                if state.search_text.trim().is_empty() {
                    state.search_results.clear();
                    state.search_loading = false;
                    return SmallVec::new();
                }

                smallvec![delay! {
                    duration: env.settings.search_debounce,
                    action: CatalogAction::SearchDebounceElapsed {
                        generation: state.search_generation,
                    }
                }]
            },

            CatalogAction::MarkInCart { product_id } => {
                for product in state
                    .products
                    .iter_mut()
                    .chain(state.search_results.iter_mut())
                    .filter(|product| product.id == product_id)
                {
                    product.is_in_my_cart = true;
                }
                SmallVec::new()
            },

            // ========== Events ==========
            CatalogAction::ProductsLoaded { page, load_more } => {
                state.loading = false;
                state.loading_more = false;
                let page_size = usize::try_from(state.page_size).unwrap_or(usize::MAX);
                state.has_more = page.products.len() == page_size;
                state.price_range = page.price_range();

                if load_more {
                    state.products.extend(page.products);
                } else {
                    state.products = page.products;
                }
                SmallVec::new()
            },

            CatalogAction::ProductsFailed { .. } => {
                state.loading = false;
                state.loading_more = false;
                state.products.clear();
                state.has_more = false;
                SmallVec::new()
            },

            CatalogAction::BrandsLoaded { brands } => {
                state.brands = brands;
                SmallVec::new()
            },

            CatalogAction::CategoriesLoaded { categories } => {
                state.categories = categories;
                SmallVec::new()
            },

            CatalogAction::SubCategoriesLoaded { sub_categories } => {
                state.sub_categories = sub_categories;
                SmallVec::new()
            },

            CatalogAction::SearchDebounceElapsed { generation } => {
                if generation != state.search_generation {
                    tracing::trace!(generation, latest = state.search_generation, "Stale debounce");
                    return SmallVec::new();
                }
                let search = state.search_text.trim().to_string();
                smallvec![Self::search(state, search, env)]
            },

            CatalogAction::SearchResultsLoaded { products } => {
                state.search_results = products;
                state.search_loading = false;
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use storefront_api::{BrandId, ProductId};
    use storefront_testing::{assertions, effects::collect_all, test_clock, ReducerTest};

    use crate::mocks::{ApiCall, MockEnvironment, MockStorefrontApi};

    type Test = ReducerTest<
        CatalogReducer<MockStorefrontApi>,
        CatalogState,
        CatalogAction,
        StorefrontEnvironment<MockStorefrontApi>,
    >;

    fn mock_env() -> MockEnvironment {
        MockEnvironment::new(MockStorefrontApi::with_sample_catalog(), Arc::new(test_clock()))
    }

    fn test() -> Test {
        ReducerTest::new(CatalogReducer::new()).with_env(mock_env().env)
    }

    fn products(ids: std::ops::RangeInclusive<u64>) -> Vec<Product> {
        ids.map(|id| Product::new(id, format!("Phone {id}"), 100.0)).collect()
    }

    fn page(ids: std::ops::RangeInclusive<u64>) -> ProductPage {
        ProductPage {
            products: products(ids),
            min_price: Some(100.0),
            max_price: Some(100.0),
        }
    }

    #[test]
    fn test_load_more_only_advances_page() {
        test()
            .given_state(CatalogState::new(10))
            .when_action(CatalogAction::LoadMore)
            .then_state(|state| {
                assert_eq!(state.page_number, 2);
                assert!(!state.is_fetching());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_reset_page() {
        test()
            .given_state(CatalogState {
                products: products(1..=10),
                page_number: 3,
                has_more: false,
                ..CatalogState::new(10)
            })
            .when_action(CatalogAction::ResetPage)
            .then_state(|state| {
                assert_eq!(state.page_number, 1);
                assert!(state.products.is_empty());
                assert!(state.has_more);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_get_products_sets_loading_flags() {
        test()
            .given_state(CatalogState::new(10))
            .when_action(CatalogAction::GetProducts {
                filter: ProductFilter::search("pixel"),
                load_more: false,
            })
            .then_state(|state| {
                assert!(state.loading);
                assert!(!state.loading_more);
                assert_eq!(state.active_filter.search, "pixel");
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();

        test()
            .given_state(CatalogState::new(10))
            .when_action(CatalogAction::GetProducts {
                filter: ProductFilter::default(),
                load_more: true,
            })
            .then_state(|state| {
                assert!(!state.loading);
                assert!(state.loading_more);
            })
            .run();
    }

    #[test]
    fn test_full_page_keeps_has_more() {
        test()
            .given_state(CatalogState {
                loading: true,
                ..CatalogState::new(10)
            })
            .when_action(CatalogAction::ProductsLoaded {
                page: page(1..=10),
                load_more: false,
            })
            .then_state(|state| {
                assert_eq!(state.products.len(), 10);
                assert!(state.has_more);
                assert!(!state.loading);
                assert_eq!(state.price_range, Some(PriceRange { min: 100.0, max: 100.0 }));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_short_first_page_ends_listing() {
        test()
            .given_state(CatalogState {
                active_filter: ProductFilter::search("iphone"),
                loading: true,
                ..CatalogState::new(10)
            })
            .when_action(CatalogAction::ProductsLoaded {
                page: page(1..=7),
                load_more: false,
            })
            .then_state(|state| {
                assert_eq!(state.products.len(), 7);
                assert!(!state.has_more);
                assert!(!state.loading);
            })
            .run();
    }

    #[test]
    fn test_short_page_appends_and_ends_listing() {
        test()
            .given_state(CatalogState {
                products: products(1..=10),
                page_number: 2,
                loading_more: true,
                ..CatalogState::new(10)
            })
            .when_action(CatalogAction::ProductsLoaded {
                page: page(11..=13),
                load_more: true,
            })
            .then_state(|state| {
                assert_eq!(state.products.len(), 13);
                assert_eq!(state.products[10].id, ProductId(11));
                assert!(!state.has_more);
                assert!(!state.loading_more);
            })
            .run();
    }

    #[test]
    fn test_failure_clears_listing() {
        test()
            .given_state(CatalogState {
                products: products(1..=10),
                loading_more: true,
                ..CatalogState::new(10)
            })
            .when_action(CatalogAction::ProductsFailed {
                error: "Request failed: reset".into(),
            })
            .then_state(|state| {
                assert!(state.products.is_empty());
                assert!(!state.has_more);
                assert!(!state.loading_more);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_apply_filter_resets_then_fetches() {
        test()
            .given_state(CatalogState {
                products: products(1..=20),
                page_number: 2,
                ..CatalogState::new(10)
            })
            .when_action(CatalogAction::ApplyFilter {
                filter: ProductFilter::default().with_brand(BrandId(2)),
            })
            .then_state(|state| {
                assert_eq!(state.page_number, 1);
                assert!(state.products.is_empty());
                assert!(state.loading);
                assert_eq!(state.active_filter.brand_id, Some(BrandId(2)));
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn test_load_next_page_skipped_when_exhausted_or_busy() {
        test()
            .given_state(CatalogState {
                has_more: false,
                ..CatalogState::new(10)
            })
            .when_action(CatalogAction::LoadNextPage)
            .then_state(|state| assert_eq!(state.page_number, 1))
            .then_effects(assertions::assert_no_effects)
            .run();

        test()
            .given_state(CatalogState {
                loading_more: true,
                ..CatalogState::new(10)
            })
            .when_action(CatalogAction::LoadNextPage)
            .then_state(|state| assert_eq!(state.page_number, 1))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_search_text_schedules_debounce() {
        test()
            .given_state(CatalogState::new(10))
            .when_action(CatalogAction::SearchTextChanged { text: "pix".into() })
            .when_action(CatalogAction::SearchTextChanged { text: "pixel".into() })
            .then_state(|state| {
                assert_eq!(state.search_generation, 2);
                assert_eq!(state.search_text, "pixel");
            })
            .then_effects(|effects| match &effects[0] {
                Effect::Delay { duration, action } => {
                    assert_eq!(*duration, Duration::from_millis(500));
                    assert_eq!(**action, CatalogAction::SearchDebounceElapsed { generation: 2 });
                },
                other => panic!("expected a delay, got {other:?}"),
            })
            .run();
    }

    #[test]
    fn test_stale_debounce_is_ignored() {
        test()
            .given_state(CatalogState {
                search_text: "pixel".into(),
                search_generation: 3,
                ..CatalogState::new(10)
            })
            .when_action(CatalogAction::SearchDebounceElapsed { generation: 2 })
            .then_state(|state| assert!(!state.search_loading))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_blank_search_clears_results() {
        test()
            .given_state(CatalogState {
                search_results: products(1..=3),
                ..CatalogState::new(10)
            })
            .when_action(CatalogAction::SearchTextChanged { text: "  ".into() })
            .then_state(|state| assert!(state.search_results.is_empty()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_mark_in_cart_flags_every_copy() {
        test()
            .given_state(CatalogState {
                products: products(1..=3),
                search_results: products(2..=2),
                ..CatalogState::new(10)
            })
            .when_action(CatalogAction::MarkInCart { product_id: ProductId(2) })
            .then_state(|state| {
                assert!(state.products[1].is_in_my_cart);
                assert!(!state.products[0].is_in_my_cart);
                assert!(state.search_results[0].is_in_my_cart);
            })
            .run();
    }

    #[tokio::test]
    async fn test_get_products_effect_queries_current_page() {
        let mock = mock_env();
        let reducer = CatalogReducer::<MockStorefrontApi>::new();
        let mut state = CatalogState {
            page_number: 2,
            ..CatalogState::new(10)
        };

        let effects = reducer.reduce(
            &mut state,
            CatalogAction::GetProducts {
                filter: ProductFilter::default(),
                load_more: true,
            },
            &mock.env,
        );
        let actions = collect_all(effects).await;

        match actions.as_slice() {
            [CatalogAction::ProductsLoaded { page, load_more: true }] => {
                assert_eq!(page.products.len(), 2);
            },
            other => panic!("unexpected actions: {other:?}"),
        }
        assert!(matches!(
            mock.api.calls().as_slice(),
            [ApiCall::FilteredProducts(query)] if query.page_number == 2 && query.page_size == 10
        ));
    }

    #[tokio::test]
    async fn test_facet_failure_degrades_to_empty() {
        let mock = mock_env();
        mock.api.fail(
            crate::mocks::Endpoint::Brands,
            storefront_api::ApiError::Transport("down".into()),
        );
        let mut state = CatalogState::default();

        let effects = CatalogReducer::new().reduce(&mut state, CatalogAction::GetBrands, &mock.env);

        assert_eq!(
            collect_all(effects).await,
            vec![CatalogAction::BrandsLoaded { brands: Vec::new() }]
        );
    }
}
