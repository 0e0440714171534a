//! # Storefront
//!
//! Client-side data layer of a mobile-phone storefront.
//!
//! Each feature (catalog, cart, landing page, auth, header menu, profile) is
//! a reducer driven by a [`storefront_runtime::Store`]. Network calls are
//! effects against a [`storefront_api::StorefrontApi`] backend, injected
//! through [`StorefrontEnvironment`] together with token storage, page
//! navigation and a clock.
//!
//! ## Example
//!
//! ```ignore
//! use storefront::{Config, Storefront, TracingNavigator};
//! use storefront::stores::CatalogAction;
//!
//! let app = Storefront::connect(&Config::from_env(), Arc::new(TracingNavigator))?;
//!
//! let mut handle = app
//!     .catalog()
//!     .send(CatalogAction::GetProducts { filter: Default::default(), load_more: false })
//!     .await?;
//! handle.wait().await;
//!
//! let count = app.catalog().state(|s| s.products.len()).await;
//! ```

pub mod app;
pub mod config;
pub mod environment;
pub mod mocks;
pub mod navigation;
pub mod stores;

pub use app::{AppError, Storefront};
pub use config::{Config, ConfigError};
pub use environment::{StoreSettings, StorefrontEnvironment};
pub use navigation::{Navigator, RedirectToLogin, Route, TracingNavigator};
