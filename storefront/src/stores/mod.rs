//! Feature stores.
//!
//! Each store is a reducer over its own state, driven by a
//! [`storefront_runtime::Store`] and sharing one
//! [`crate::environment::StorefrontEnvironment`].

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod header;
pub mod home;
pub mod profile;

pub use auth::{AuthAction, AuthReducer, AuthState};
pub use cart::{CartAction, CartReducer, CartState, CheckoutStatus};
pub use catalog::{CatalogAction, CatalogReducer, CatalogState};
pub use header::{HeaderAction, HeaderReducer, HeaderState};
pub use home::{HomeAction, HomeReducer, HomeState};
pub use profile::{ProfileAction, ProfileReducer, ProfileState};
