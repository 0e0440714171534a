//! Headless storefront session.
//!
//! Loads the header menu, the facets and the first catalog page, then logs
//! what came back.
//!
//! # Usage
//!
//! Against a backend (`STOREFRONT_API_URL`, default `http://localhost:5000/api`):
//! ```bash
//! cargo run --bin storefront
//! ```
//!
//! Against the built-in sample catalog:
//! ```bash
//! cargo run --bin storefront -- --offline
//! ```

use std::sync::Arc;
use std::time::Duration;

use storefront::mocks::MockStorefrontApi;
use storefront::stores::{CatalogAction, HeaderAction, HomeAction};
use storefront::{Config, Storefront, StorefrontEnvironment, TracingNavigator};
use storefront_api::{MemoryTokenStore, ProductFilter, StorefrontApi};
use storefront_core::environment::SystemClock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate()?;

    if std::env::args().any(|arg| arg == "--offline") {
        tracing::info!("Using the sample catalog");
        let env = StorefrontEnvironment::new(
            MockStorefrontApi::with_sample_catalog(),
            Arc::new(MemoryTokenStore::new()),
            Arc::new(TracingNavigator),
            Arc::new(SystemClock),
            config.settings(),
        );
        browse(&Storefront::new(env)).await
    } else {
        let app = Storefront::connect(&config, Arc::new(TracingNavigator))?;
        browse(&app).await
    }
}

async fn browse<B>(app: &Storefront<B>) -> Result<(), Box<dyn std::error::Error>>
where
    B: StorefrontApi + Clone + 'static,
{
    let mut handles = vec![
        app.header().send(HeaderAction::LoadCatalog).await?,
        app.catalog().send(CatalogAction::GetBrands).await?,
        app.catalog().send(CatalogAction::GetCategories).await?,
        app.catalog()
            .send(CatalogAction::GetProducts {
                filter: ProductFilter::default(),
                load_more: false,
            })
            .await?,
        app.home().send(HomeAction::GetProducts).await?,
    ];
    for handle in &mut handles {
        handle.wait().await;
    }

    let categories = app.header().state(|s| s.categories.len()).await;
    let (brands, products, has_more, price_range) = app
        .catalog()
        .state(|s| (s.brands.len(), s.products.len(), s.has_more, s.price_range))
        .await;
    let featured = app.home().state(|s| s.products.len()).await;

    tracing::info!(categories, brands, featured, "Storefront loaded");
    tracing::info!(products, has_more, ?price_range, "First catalog page");

    app.shutdown(SHUTDOWN_TIMEOUT).await?;
    Ok(())
}
