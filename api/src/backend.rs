//! The storefront backend as seen by the stores

use std::future::Future;

use crate::account::{Credentials, ProfileUpdate, Registration, UserProfile};
use crate::error::ApiResult;
use crate::order::OrderSummary;
use crate::types::{Brand, CartLine, Category, Product, ProductId, ProductPage, ProductQuery, SubCategory};

/// Storefront REST backend
///
/// [`ApiClient`](crate::ApiClient) talks to the real service; tests use an
/// in-memory implementation. List operations return an empty list when the
/// backend answers `204 No Content`.
pub trait StorefrontApi: Send + Sync {
    /// Exchange credentials for a bearer token
    ///
    /// # Errors
    ///
    /// Returns `Status { status: 400, .. }` for wrong credentials.
    fn login(&self, credentials: &Credentials) -> impl Future<Output = ApiResult<String>> + Send;

    /// Create an account
    ///
    /// # Errors
    ///
    /// Returns `Status { status: 500, .. }` when the user name is taken.
    fn register(&self, registration: &Registration) -> impl Future<Output = ApiResult<()>> + Send;

    /// One page of the filtered catalog
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    fn filtered_products(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = ApiResult<ProductPage>> + Send;

    /// First `page_size` products for the landing page
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    fn home_products(&self, page_size: u32) -> impl Future<Output = ApiResult<Vec<Product>>> + Send;

    /// Live name search
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    fn search_products(&self, search: &str) -> impl Future<Output = ApiResult<Vec<Product>>> + Send;

    /// All brands
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    fn brands(&self) -> impl Future<Output = ApiResult<Vec<Brand>>> + Send;

    /// All categories, without nested sub-categories
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    fn categories(&self) -> impl Future<Output = ApiResult<Vec<Category>>> + Send;

    /// All sub-categories
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    fn sub_categories(&self) -> impl Future<Output = ApiResult<Vec<SubCategory>>> + Send;

    /// Categories with their sub-categories, for the header menu
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status, or decode failure.
    fn category_tree(&self) -> impl Future<Output = ApiResult<Vec<Category>>> + Send;

    /// Current cart contents
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when signed out.
    fn cart(&self) -> impl Future<Output = ApiResult<Vec<CartLine>>> + Send;

    /// Put one unit of a product in the cart
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the mutation.
    fn add_to_cart(&self, product_id: ProductId) -> impl Future<Output = ApiResult<()>> + Send;

    /// Drop a product's line from the cart
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the mutation.
    fn remove_from_cart(&self, product_id: ProductId) -> impl Future<Output = ApiResult<()>> + Send;

    /// Add one unit to an existing line
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the mutation.
    fn increase_in_cart(&self, product_id: ProductId) -> impl Future<Output = ApiResult<()>> + Send;

    /// Take one unit off an existing line
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the mutation.
    fn decrease_in_cart(&self, product_id: ProductId) -> impl Future<Output = ApiResult<()>> + Send;

    /// Empty the cart
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the mutation.
    fn clear_cart(&self) -> impl Future<Output = ApiResult<()>> + Send;

    /// The signed-in user's profile
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when signed out.
    fn profile(&self) -> impl Future<Output = ApiResult<UserProfile>> + Send;

    /// Save profile edits, including an optional avatar upload
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    fn update_profile(&self, update: &ProfileUpdate) -> impl Future<Output = ApiResult<()>> + Send;

    /// Hand an order to the backend's checkout relay
    ///
    /// # Errors
    ///
    /// Returns an error if the relay rejects the order.
    fn submit_order(&self, order: &OrderSummary) -> impl Future<Output = ApiResult<()>> + Send;
}
