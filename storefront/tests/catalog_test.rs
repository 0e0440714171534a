//! Catalog store scenarios against the in-memory backend

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use storefront::mocks::{ApiCall, Endpoint, MockEnvironment, MockStorefrontApi};
use storefront::stores::{CatalogAction, CatalogReducer, CatalogState};
use storefront::{StoreSettings, Storefront};
use storefront_api::{BrandId, Product, ProductFilter, ProductPage};
use storefront_core::reducer::Reducer;
use storefront_testing::test_clock;

const TIMEOUT: Duration = Duration::from_secs(2);

fn sample_store(settings: StoreSettings) -> (MockEnvironment, Storefront<MockStorefrontApi>) {
    let mock = MockEnvironment::with_settings(
        MockStorefrontApi::with_sample_catalog(),
        Arc::new(test_clock()),
        settings,
    );
    let app = Storefront::new(mock.env.clone());
    (mock, app)
}

fn product_ids(state: &CatalogState) -> Vec<u64> {
    state.products.iter().map(|product| product.id.0).collect()
}

#[tokio::test]
async fn test_infinite_scroll_until_exhausted() {
    let (mock, app) = sample_store(StoreSettings {
        catalog_page_size: 5,
        ..StoreSettings::default()
    });
    let catalog = app.catalog();

    let mut handle = catalog
        .send(CatalogAction::GetProducts {
            filter: ProductFilter::default(),
            load_more: false,
        })
        .await
        .unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();

    assert_eq!(catalog.state(product_ids).await, vec![1, 2, 3, 4, 5]);
    assert!(catalog.state(|s| s.has_more).await);

    for _ in 0..2 {
        let mut handle = catalog.send(CatalogAction::LoadNextPage).await.unwrap();
        handle.wait_with_timeout(TIMEOUT).await.unwrap();
    }

    assert_eq!(catalog.state(product_ids).await, (1..=12).collect::<Vec<_>>());
    assert!(!catalog.state(|s| s.has_more).await);
    assert_eq!(catalog.state(|s| s.page_number).await, 3);

    // Exhausted: no further request
    let mut handle = catalog.send(CatalogAction::LoadNextPage).await.unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();
    assert_eq!(mock.api.call_count(Endpoint::FilteredProducts), 3);
}

#[tokio::test]
async fn test_apply_filter_restarts_listing() {
    let (mock, app) = sample_store(StoreSettings {
        catalog_page_size: 5,
        ..StoreSettings::default()
    });
    let catalog = app.catalog();

    let mut handle = catalog
        .send(CatalogAction::GetProducts {
            filter: ProductFilter::default(),
            load_more: false,
        })
        .await
        .unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();
    let mut handle = catalog.send(CatalogAction::LoadNextPage).await.unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();

    let apple = ProductFilter::default().with_brand(BrandId(1));
    let mut handle = catalog
        .send(CatalogAction::ApplyFilter {
            filter: apple.clone(),
        })
        .await
        .unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();

    assert_eq!(catalog.state(product_ids).await, vec![1, 2, 3]);
    assert!(!catalog.state(|s| s.has_more).await);
    let range = catalog.state(|s| s.price_range).await.unwrap();
    assert!((range.min - 429.0).abs() < f64::EPSILON);
    assert!((range.max - 999.0).abs() < f64::EPSILON);

    match mock.api.calls().last() {
        Some(ApiCall::FilteredProducts(query)) => {
            assert_eq!(query.page_number, 1);
            assert_eq!(query.filter, apple);
        },
        other => panic!("unexpected last call: {other:?}"),
    }
}

#[tokio::test]
async fn test_facets_load() {
    let (_mock, app) = sample_store(StoreSettings::default());
    let catalog = app.catalog();

    for action in [
        CatalogAction::GetBrands,
        CatalogAction::GetCategories,
        CatalogAction::GetSubCategories,
    ] {
        let mut handle = catalog.send(action).await.unwrap();
        handle.wait_with_timeout(TIMEOUT).await.unwrap();
    }

    let (brands, categories, sub_categories) = catalog
        .state(|s| (s.brands.len(), s.categories.len(), s.sub_categories.len()))
        .await;
    assert_eq!((brands, categories, sub_categories), (3, 2, 3));
}

#[tokio::test]
async fn test_facets_reload_identically() {
    let (mock, app) = sample_store(StoreSettings::default());
    let catalog = app.catalog();

    let mut snapshots = Vec::new();
    for _ in 0..2 {
        for action in [
            CatalogAction::GetBrands,
            CatalogAction::GetCategories,
            CatalogAction::GetSubCategories,
        ] {
            let mut handle = catalog.send(action).await.unwrap();
            handle.wait_with_timeout(TIMEOUT).await.unwrap();
        }
        snapshots.push(catalog.state(CatalogState::clone).await);
    }

    assert_eq!(snapshots[0], snapshots[1]);
    assert!(!snapshots[1].brands.is_empty());
    assert_eq!(mock.api.call_count(Endpoint::Brands), 2);
    assert_eq!(mock.api.call_count(Endpoint::Categories), 2);
    assert_eq!(mock.api.call_count(Endpoint::SubCategories), 2);
}

#[tokio::test]
async fn test_live_search_sends_only_latest_text() {
    let (mock, app) = sample_store(StoreSettings {
        search_debounce: Duration::from_millis(200),
        ..StoreSettings::default()
    });
    let catalog = app.catalog();

    catalog
        .send(CatalogAction::SearchTextChanged {
            text: "gal".to_string(),
        })
        .await
        .unwrap();
    let loaded = catalog
        .send_and_wait_for(
            CatalogAction::SearchTextChanged {
                text: "galaxy s".to_string(),
            },
            |action| matches!(action, CatalogAction::SearchResultsLoaded { .. }),
            TIMEOUT,
        )
        .await
        .unwrap();

    let products = match loaded {
        CatalogAction::SearchResultsLoaded { products } => products,
        other => panic!("unexpected action: {other:?}"),
    };
    let names: Vec<_> = products.iter().map(|product| product.name.as_str()).collect();
    assert_eq!(names, vec!["Galaxy S24 Ultra", "Galaxy S24"]);

    let searches: Vec<_> = mock
        .api
        .calls()
        .into_iter()
        .filter(|call| matches!(call, ApiCall::SearchProducts { .. }))
        .collect();
    assert_eq!(
        searches,
        vec![ApiCall::SearchProducts {
            search: "galaxy s".to_string()
        }]
    );
}

#[tokio::test]
async fn test_failed_page_empties_listing() {
    let (mock, app) = sample_store(StoreSettings::default());
    let catalog = app.catalog();

    let mut handle = catalog
        .send(CatalogAction::GetProducts {
            filter: ProductFilter::default(),
            load_more: false,
        })
        .await
        .unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();
    assert_eq!(catalog.state(|s| s.products.len()).await, 10);

    mock.api.fail(
        Endpoint::FilteredProducts,
        storefront_api::ApiError::Transport("connection reset".to_string()),
    );
    let mut handle = catalog.send(CatalogAction::LoadNextPage).await.unwrap();
    handle.wait_with_timeout(TIMEOUT).await.unwrap();

    assert!(catalog.state(|s| s.products.is_empty()).await);
    assert!(!catalog.state(|s| s.has_more).await);
    assert!(!catalog.state(|s| s.loading_more).await);
}

fn numbered(from: u64, count: usize) -> Vec<Product> {
    (from..).take(count).map(|id| Product::new(id, format!("Phone {id}"), 100.0)).collect()
}

proptest! {
    #[test]
    fn prop_load_more_appends_page(existing in 0usize..40, page_len in 0usize..=10) {
        let mock = MockEnvironment::new(MockStorefrontApi::default(), Arc::new(test_clock()));
        let reducer = CatalogReducer::<MockStorefrontApi>::new();
        let mut state = CatalogState {
            products: numbered(1, existing),
            ..CatalogState::new(10)
        };
        let before = state.products.clone();
        let page = numbered(1000, page_len);

        let effects = reducer.reduce(
            &mut state,
            CatalogAction::ProductsLoaded {
                page: ProductPage {
                    products: page.clone(),
                    min_price: None,
                    max_price: None,
                },
                load_more: true,
            },
            &mock.env,
        );

        prop_assert!(effects.is_empty());
        prop_assert_eq!(state.products.len(), existing + page_len);
        prop_assert_eq!(&state.products[..existing], &before[..]);
        prop_assert_eq!(&state.products[existing..], &page[..]);
        prop_assert_eq!(state.has_more, page_len == 10);
    }
}
