//! # Storefront API
//!
//! HTTP client adapter for the storefront REST backend.
//!
//! - [`ApiClient`]: reqwest client with bearer auth and a global `401` hook
//! - [`StorefrontApi`]: the backend operations, implemented by [`ApiClient`]
//!   and by in-memory test doubles
//! - Wire types for products, facets, cart lines, accounts and orders
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront_api::{ApiClient, LogUnauthorized, MemoryTokenStore, StorefrontApi, DEFAULT_TIMEOUT};
//!
//! # async fn example() -> Result<(), storefront_api::ApiError> {
//! let client = ApiClient::new(
//!     "http://localhost:5000/api",
//!     DEFAULT_TIMEOUT,
//!     Arc::new(MemoryTokenStore::new()),
//!     Arc::new(LogUnauthorized),
//! )?;
//!
//! let brands = client.brands().await?;
//! println!("{} brands", brands.len());
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod backend;
pub mod client;
pub mod description;
pub mod error;
pub mod order;
pub mod session;
pub mod types;

pub use account::{Avatar, Credentials, LoginResponse, ProfileUpdate, Registration, UserProfile};
pub use backend::StorefrontApi;
pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use description::{DescriptionEntry, ProductDescription};
pub use error::{ApiError, ApiResult};
pub use order::{CheckoutContact, OrderLine, OrderSummary};
pub use session::{FileTokenStore, LogUnauthorized, MemoryTokenStore, TOKEN_KEY, TokenStore, UnauthorizedHandler};
pub use types::{
    Brand, BrandId, CartLine, Category, CategoryId, PriceRange, Product, ProductFilter, ProductId,
    ProductPage, ProductQuery, SubCategory, SubCategoryId,
};
