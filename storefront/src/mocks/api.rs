//! In-memory storefront backend for testing.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use storefront_api::{
    ApiError, ApiResult, Brand, BrandId, CartLine, Category, CategoryId, Credentials,
    DescriptionEntry, OrderSummary, Product, ProductDescription, ProductFilter, ProductId,
    ProductPage, ProductQuery, ProfileUpdate, Registration, StorefrontApi, SubCategory,
    SubCategoryId, UserProfile,
};

/// Backend operations, used to inject failures and latency
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /Account/login`
    Login,
    /// `POST /Account/register`
    Register,
    /// `GET /Product/filtered`
    FilteredProducts,
    /// `GET /Product`
    HomeProducts,
    /// `GET /Product/search`
    SearchProducts,
    /// `GET /Brand`
    Brands,
    /// `GET /Category`
    Categories,
    /// `GET /SubCategory`
    SubCategories,
    /// `GET /Category/with-subcategories`
    CategoryTree,
    /// `GET /Cart`
    Cart,
    /// `POST /Cart/add/{id}`
    AddToCart,
    /// `DELETE /Cart/remove/{id}`
    RemoveFromCart,
    /// `PUT /Cart/increase/{id}`
    IncreaseInCart,
    /// `PUT /Cart/decrease/{id}`
    DecreaseInCart,
    /// `DELETE /Cart/clear`
    ClearCart,
    /// `GET /User/profile`
    Profile,
    /// `PUT /User/profile`
    UpdateProfile,
    /// `POST /Order/checkout`
    SubmitOrder,
}

/// A recorded backend call
#[derive(Clone, Debug, PartialEq)]
pub enum ApiCall {
    /// Login attempt
    Login {
        /// Account name
        user_name: String,
    },
    /// Registration attempt
    Register {
        /// Account name
        user_name: String,
    },
    /// Filtered catalog page
    FilteredProducts(ProductQuery),
    /// Landing page products
    HomeProducts {
        /// Requested size
        page_size: u32,
    },
    /// Live search
    SearchProducts {
        /// Search text
        search: String,
    },
    /// Brand list
    Brands,
    /// Category list
    Categories,
    /// Sub-category list
    SubCategories,
    /// Header category tree
    CategoryTree,
    /// Cart snapshot
    Cart,
    /// Cart add
    AddToCart(ProductId),
    /// Cart remove
    RemoveFromCart(ProductId),
    /// Cart increase
    IncreaseInCart(ProductId),
    /// Cart decrease
    DecreaseInCart(ProductId),
    /// Cart clear
    ClearCart,
    /// Profile fetch
    Profile,
    /// Profile update
    UpdateProfile,
    /// Checkout relay
    SubmitOrder,
}

impl ApiCall {
    /// Endpoint this call hits
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::Login { .. } => Endpoint::Login,
            Self::Register { .. } => Endpoint::Register,
            Self::FilteredProducts(_) => Endpoint::FilteredProducts,
            Self::HomeProducts { .. } => Endpoint::HomeProducts,
            Self::SearchProducts { .. } => Endpoint::SearchProducts,
            Self::Brands => Endpoint::Brands,
            Self::Categories => Endpoint::Categories,
            Self::SubCategories => Endpoint::SubCategories,
            Self::CategoryTree => Endpoint::CategoryTree,
            Self::Cart => Endpoint::Cart,
            Self::AddToCart(_) => Endpoint::AddToCart,
            Self::RemoveFromCart(_) => Endpoint::RemoveFromCart,
            Self::IncreaseInCart(_) => Endpoint::IncreaseInCart,
            Self::DecreaseInCart(_) => Endpoint::DecreaseInCart,
            Self::ClearCart => Endpoint::ClearCart,
            Self::Profile => Endpoint::Profile,
            Self::UpdateProfile => Endpoint::UpdateProfile,
            Self::SubmitOrder => Endpoint::SubmitOrder,
        }
    }
}

#[derive(Debug, Clone)]
struct Listing {
    product: Product,
    brand_id: Option<BrandId>,
    category_id: Option<CategoryId>,
    sub_category_id: Option<SubCategoryId>,
}

impl Listing {
    fn matches(&self, filter: &ProductFilter) -> bool {
        let price = self.product.effective_price();
        name_matches(&self.product, &filter.search)
            && filter.brand_id.is_none_or(|id| self.brand_id == Some(id))
            && filter.category_id.is_none_or(|id| self.category_id == Some(id))
            && filter
                .sub_category_id
                .is_none_or(|id| self.sub_category_id == Some(id))
            && filter.min_price.is_none_or(|min| price >= min)
            && filter.max_price.is_none_or(|max| price <= max)
    }
}

fn name_matches(product: &Product, search: &str) -> bool {
    search.is_empty() || product.name.to_lowercase().contains(&search.to_lowercase())
}

#[derive(Debug, Default)]
struct Backend {
    listings: Vec<Listing>,
    brands: Vec<Brand>,
    categories: Vec<Category>,
    cart: Vec<(ProductId, u32)>,
    users: HashMap<String, String>,
    profile: UserProfile,
    orders: Vec<OrderSummary>,
    failures: HashMap<Endpoint, ApiError>,
    latency: HashMap<Endpoint, Duration>,
    calls: Vec<ApiCall>,
}

impl Backend {
    fn in_cart(&self, id: ProductId) -> bool {
        self.cart.iter().any(|(line, _)| *line == id)
    }

    /// Product as the backend would render it for the current user
    fn render(&self, listing: &Listing) -> Product {
        let mut product = listing.product.clone();
        product.is_in_my_cart = self.in_cart(product.id);
        product
    }

    fn find(&self, id: ProductId) -> ApiResult<&Listing> {
        self.listings
            .iter()
            .find(|listing| listing.product.id == id)
            .ok_or_else(|| not_found(id))
    }

    fn cart_line(&mut self, id: ProductId) -> ApiResult<&mut u32> {
        self.cart
            .iter_mut()
            .find(|(line, _)| *line == id)
            .map(|(_, quantity)| quantity)
            .ok_or_else(|| not_found(id))
    }

    fn sub_categories(&self) -> Vec<SubCategory> {
        self.categories
            .iter()
            .flat_map(|category| category.sub_categories.iter().cloned())
            .collect()
    }
}

fn not_found(id: ProductId) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("Product {id} not found"),
    }
}

fn poisoned() -> ApiError {
    ApiError::Transport("mock backend lock poisoned".to_string())
}

fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Mock storefront backend.
///
/// Uses in-memory storage and mirrors the REST backend's behavior: filtering
/// and paging, cart bookkeeping (including zero-quantity lines left behind by
/// decrements), the `isInMyCart` flag, accounts and profile edits. Every call
/// is recorded; failures and latency can be injected per endpoint.
#[derive(Debug, Clone, Default)]
pub struct MockStorefrontApi {
    inner: Arc<Mutex<Backend>>,
}

impl MockStorefrontApi {
    /// Create an empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend seeded with a small phone catalog: 3 brands, 2 categories,
    /// 3 sub-categories and 12 products
    #[must_use]
    pub fn with_sample_catalog() -> Self {
        let flagship = SubCategoryId(1);
        let mid_range = SubCategoryId(2);
        let flip = SubCategoryId(3);

        let mut api = Self::new()
            .with_brand(Brand { id: BrandId(1), name: "Apple".into() })
            .with_brand(Brand { id: BrandId(2), name: "Samsung".into() })
            .with_brand(Brand { id: BrandId(3), name: "Google".into() })
            .with_category(Category {
                id: CategoryId(1),
                name: "Smartphones".into(),
                sub_categories: vec![
                    SubCategory { id: flagship, name: "Flagship".into(), category_id: Some(CategoryId(1)) },
                    SubCategory { id: mid_range, name: "Mid-range".into(), category_id: Some(CategoryId(1)) },
                ],
            })
            .with_category(Category {
                id: CategoryId(2),
                name: "Foldables".into(),
                sub_categories: vec![SubCategory {
                    id: flip,
                    name: "Flip".into(),
                    category_id: Some(CategoryId(2)),
                }],
            });

        let phones: [(u64, &str, f64, Option<f64>, u64, u64, SubCategoryId); 12] = [
            (1, "iPhone 15 Pro", 999.0, None, 1, 1, flagship),
            (2, "iPhone 15", 799.0, Some(749.0), 1, 1, flagship),
            (3, "iPhone SE", 429.0, None, 1, 1, mid_range),
            (4, "Galaxy S24 Ultra", 1199.0, Some(1099.0), 2, 1, flagship),
            (5, "Galaxy S24", 799.0, None, 2, 1, flagship),
            (6, "Galaxy A55", 449.0, None, 2, 1, mid_range),
            (7, "Galaxy A35", 349.0, Some(299.0), 2, 1, mid_range),
            (8, "Galaxy Z Flip5", 999.0, None, 2, 2, flip),
            (9, "Pixel 8 Pro", 999.0, None, 3, 1, flagship),
            (10, "Pixel 8", 699.0, Some(599.0), 3, 1, flagship),
            (11, "Pixel 8a", 499.0, None, 3, 1, mid_range),
            (12, "Pixel Fold", 1799.0, None, 3, 2, flip),
        ];

        for (id, name, price, discount, brand, category, sub_category) in phones {
            let mut product = Product::new(id, name, price);
            product.quantity = 10;
            product.description = ProductDescription::from_entries(vec![
                DescriptionEntry::new("Description", format!("{name} smartphone")),
                DescriptionEntry::new("Warranty", "2 years"),
            ]);
            if let Some(discount) = discount {
                product = product.with_discount(discount);
            }
            api = api.with_listing(product, BrandId(brand), CategoryId(category), sub_category);
        }

        api
    }

    fn update(&self, f: impl FnOnce(&mut Backend)) {
        if let Ok(mut backend) = self.inner.lock() {
            f(&mut *backend);
        }
    }

    fn read<T: Default>(&self, f: impl FnOnce(&Backend) -> T) -> T {
        self.inner.lock().map(|backend| f(&*backend)).unwrap_or_default()
    }

    /// Add a product with no facets.
    #[must_use]
    pub fn with_product(self, product: Product) -> Self {
        self.update(|backend| {
            backend.listings.push(Listing {
                product,
                brand_id: None,
                category_id: None,
                sub_category_id: None,
            });
        });
        self
    }

    /// Add a product under a brand, category and sub-category.
    #[must_use]
    pub fn with_listing(
        self,
        product: Product,
        brand_id: BrandId,
        category_id: CategoryId,
        sub_category_id: SubCategoryId,
    ) -> Self {
        self.update(|backend| {
            backend.listings.push(Listing {
                product,
                brand_id: Some(brand_id),
                category_id: Some(category_id),
                sub_category_id: Some(sub_category_id),
            });
        });
        self
    }

    /// Add a brand.
    #[must_use]
    pub fn with_brand(self, brand: Brand) -> Self {
        self.update(|backend| backend.brands.push(brand));
        self
    }

    /// Add a category together with its sub-categories.
    #[must_use]
    pub fn with_category(self, category: Category) -> Self {
        self.update(|backend| backend.categories.push(category));
        self
    }

    /// Register an account.
    #[must_use]
    pub fn with_user(self, user_name: &str, password: &str) -> Self {
        self.update(|backend| {
            backend.users.insert(user_name.to_string(), password.to_string());
        });
        self
    }

    /// Set the signed-in user's profile.
    #[must_use]
    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.update(|backend| backend.profile = profile);
        self
    }

    /// Put a cart line in place, bypassing the cart endpoints.
    #[must_use]
    pub fn with_cart_line(self, product_id: ProductId, quantity: u32) -> Self {
        self.update(|backend| backend.cart.push((product_id, quantity)));
        self
    }

    /// Make every call to `endpoint` fail with `error` until cleared.
    pub fn fail(&self, endpoint: Endpoint, error: ApiError) {
        self.update(|backend| {
            backend.failures.insert(endpoint, error);
        });
    }

    /// Remove every injected failure.
    pub fn clear_failures(&self) {
        self.update(|backend| backend.failures.clear());
    }

    /// Delay every answer from `endpoint`.
    pub fn set_latency(&self, endpoint: Endpoint, latency: Duration) {
        self.update(|backend| {
            backend.latency.insert(endpoint, latency);
        });
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.read(|backend| backend.calls.clone())
    }

    /// Number of calls that hit `endpoint`.
    #[must_use]
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.read(|backend| {
            backend
                .calls
                .iter()
                .filter(|call| call.endpoint() == endpoint)
                .count()
        })
    }

    /// Quantity of a product in the backend cart.
    #[must_use]
    pub fn cart_quantity(&self, product_id: ProductId) -> Option<u32> {
        self.read(|backend| {
            backend
                .cart
                .iter()
                .find(|(id, _)| *id == product_id)
                .map(|(_, quantity)| *quantity)
        })
    }

    /// Orders received by the checkout relay.
    #[must_use]
    pub fn orders(&self) -> Vec<OrderSummary> {
        self.read(|backend| backend.orders.clone())
    }

    /// Stored profile.
    #[must_use]
    pub fn stored_profile(&self) -> UserProfile {
        self.read(|backend| backend.profile.clone())
    }

    /// Record the call, honor injected latency and failures, then run `op`.
    fn respond<T, F>(&self, call: ApiCall, op: F) -> impl Future<Output = ApiResult<T>> + Send + use<T, F>
    where
        T: Send + 'static,
        F: FnOnce(&mut Backend) -> ApiResult<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);

        async move {
            let endpoint = call.endpoint();
            let latency = {
                let mut backend = inner.lock().map_err(|_| poisoned())?;
                backend.calls.push(call);
                backend.latency.get(&endpoint).copied()
            };

            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }

            let mut backend = inner.lock().map_err(|_| poisoned())?;
            if let Some(error) = backend.failures.get(&endpoint).cloned() {
                return Err(error);
            }
            op(&mut *backend)
        }
    }
}

impl StorefrontApi for MockStorefrontApi {
    fn login(&self, credentials: &Credentials) -> impl Future<Output = ApiResult<String>> + Send {
        let credentials = credentials.clone();
        let call = ApiCall::Login {
            user_name: credentials.user_name.clone(),
        };

        self.respond(call, move |backend| {
            match backend.users.get(&credentials.user_name) {
                Some(password) if *password == credentials.password => {
                    Ok(format!("token-{}", credentials.user_name))
                },
                _ => Err(ApiError::Status {
                    status: 400,
                    message: "Invalid credentials".to_string(),
                }),
            }
        })
    }

    fn register(&self, registration: &Registration) -> impl Future<Output = ApiResult<()>> + Send {
        let registration = registration.clone();
        let call = ApiCall::Register {
            user_name: registration.user_name.clone(),
        };

        self.respond(call, move |backend| {
            if backend.users.contains_key(&registration.user_name) {
                return Err(ApiError::Status {
                    status: 500,
                    message: "Duplicate user name".to_string(),
                });
            }
            backend
                .users
                .insert(registration.user_name.clone(), registration.password.clone());
            backend.profile = UserProfile {
                user_name: registration.user_name,
                email: registration.email,
                first_name: registration.first_name,
                last_name: registration.last_name,
                ..UserProfile::default()
            };
            Ok(())
        })
    }

    fn filtered_products(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = ApiResult<ProductPage>> + Send {
        let query = query.clone();

        self.respond(ApiCall::FilteredProducts(query.clone()), move |backend| {
            let matching: Vec<&Listing> = backend
                .listings
                .iter()
                .filter(|listing| listing.matches(&query.filter))
                .collect();

            let prices = matching.iter().map(|listing| listing.product.effective_price());
            let min_price = prices.clone().reduce(f64::min);
            let max_price = prices.reduce(f64::max);

            let skip = to_usize(query.page_number.saturating_sub(1))
                .saturating_mul(to_usize(query.page_size));
            let products = matching
                .iter()
                .skip(skip)
                .take(to_usize(query.page_size))
                .map(|listing| backend.render(listing))
                .collect();

            Ok(ProductPage {
                products,
                min_price,
                max_price,
            })
        })
    }

    fn home_products(&self, page_size: u32) -> impl Future<Output = ApiResult<Vec<Product>>> + Send {
        self.respond(ApiCall::HomeProducts { page_size }, move |backend| {
            Ok(backend
                .listings
                .iter()
                .take(to_usize(page_size))
                .map(|listing| backend.render(listing))
                .collect::<Vec<_>>())
        })
    }

    fn search_products(&self, search: &str) -> impl Future<Output = ApiResult<Vec<Product>>> + Send {
        let search = search.to_string();

        self.respond(
            ApiCall::SearchProducts {
                search: search.clone(),
            },
            move |backend| {
                Ok(backend
                    .listings
                    .iter()
                    .filter(|listing| name_matches(&listing.product, &search))
                    .map(|listing| backend.render(listing))
                    .collect::<Vec<_>>())
            },
        )
    }

    fn brands(&self) -> impl Future<Output = ApiResult<Vec<Brand>>> + Send {
        self.respond(ApiCall::Brands, |backend| Ok(backend.brands.clone()))
    }

    fn categories(&self) -> impl Future<Output = ApiResult<Vec<Category>>> + Send {
        self.respond(ApiCall::Categories, |backend| {
            Ok(backend
                .categories
                .iter()
                .map(|category| Category {
                    sub_categories: Vec::new(),
                    ..category.clone()
                })
                .collect::<Vec<_>>())
        })
    }

    fn sub_categories(&self) -> impl Future<Output = ApiResult<Vec<SubCategory>>> + Send {
        self.respond(ApiCall::SubCategories, |backend| Ok(backend.sub_categories()))
    }

    fn category_tree(&self) -> impl Future<Output = ApiResult<Vec<Category>>> + Send {
        self.respond(ApiCall::CategoryTree, |backend| Ok(backend.categories.clone()))
    }

    fn cart(&self) -> impl Future<Output = ApiResult<Vec<CartLine>>> + Send {
        self.respond(ApiCall::Cart, |backend| {
            backend
                .cart
                .iter()
                .map(|(id, quantity)| {
                    let mut product = backend.find(*id)?.product.clone();
                    product.is_in_my_cart = true;
                    Ok(CartLine {
                        product,
                        quantity: *quantity,
                    })
                })
                .collect::<ApiResult<Vec<_>>>()
        })
    }

    fn add_to_cart(&self, product_id: ProductId) -> impl Future<Output = ApiResult<()>> + Send {
        self.respond(ApiCall::AddToCart(product_id), move |backend| {
            backend.find(product_id)?;
            match backend.cart.iter().position(|(id, _)| *id == product_id) {
                Some(index) => backend.cart[index].1 += 1,
                None => backend.cart.push((product_id, 1)),
            }
            Ok(())
        })
    }

    fn remove_from_cart(&self, product_id: ProductId) -> impl Future<Output = ApiResult<()>> + Send {
        self.respond(ApiCall::RemoveFromCart(product_id), move |backend| {
            backend.cart.retain(|(id, _)| *id != product_id);
            Ok(())
        })
    }

    fn increase_in_cart(&self, product_id: ProductId) -> impl Future<Output = ApiResult<()>> + Send {
        self.respond(ApiCall::IncreaseInCart(product_id), move |backend| {
            *backend.cart_line(product_id)? += 1;
            Ok(())
        })
    }

    fn decrease_in_cart(&self, product_id: ProductId) -> impl Future<Output = ApiResult<()>> + Send {
        self.respond(ApiCall::DecreaseInCart(product_id), move |backend| {
            let quantity = backend.cart_line(product_id)?;
            *quantity = quantity.saturating_sub(1);
            Ok(())
        })
    }

    fn clear_cart(&self) -> impl Future<Output = ApiResult<()>> + Send {
        self.respond(ApiCall::ClearCart, |backend| {
            backend.cart.clear();
            Ok(())
        })
    }

    fn profile(&self) -> impl Future<Output = ApiResult<UserProfile>> + Send {
        self.respond(ApiCall::Profile, |backend| Ok(backend.profile.clone()))
    }

    fn update_profile(&self, update: &ProfileUpdate) -> impl Future<Output = ApiResult<()>> + Send {
        let update = update.clone();

        self.respond(ApiCall::UpdateProfile, move |backend| {
            let profile = &mut backend.profile;
            if let Some(first_name) = update.first_name {
                profile.first_name = Some(first_name);
            }
            if let Some(last_name) = update.last_name {
                profile.last_name = Some(last_name);
            }
            if let Some(email) = update.email {
                profile.email = email;
            }
            if let Some(phone_number) = update.phone_number {
                profile.phone_number = Some(phone_number);
            }
            if let Some(avatar) = update.avatar {
                profile.avatar = Some(format!("/avatars/{}", avatar.file_name));
            }
            Ok(())
        })
    }

    fn submit_order(&self, order: &OrderSummary) -> impl Future<Output = ApiResult<()>> + Send {
        let order = order.clone();

        self.respond(ApiCall::SubmitOrder, move |backend| {
            backend.orders.push(order);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_filtered_paging_and_price_range() {
        let api = MockStorefrontApi::with_sample_catalog();
        let query = ProductQuery {
            filter: ProductFilter::default(),
            page_number: 2,
            page_size: 10,
        };

        let page = api.filtered_products(&query).await.unwrap();

        assert_eq!(page.products.len(), 2);
        assert_eq!(page.products[0].id, ProductId(11));
        assert_eq!(page.min_price, Some(299.0));
        assert_eq!(page.max_price, Some(1799.0));
    }

    #[tokio::test]
    async fn test_filter_by_brand_and_name() {
        let api = MockStorefrontApi::with_sample_catalog();
        let query = ProductQuery {
            filter: ProductFilter::search("galaxy s").with_brand(BrandId(2)),
            page_number: 1,
            page_size: 10,
        };

        let page = api.filtered_products(&query).await.unwrap();
        let ids: Vec<_> = page.products.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![4, 5]);
    }

    #[tokio::test]
    async fn test_decrease_leaves_zero_quantity_line() {
        let api = MockStorefrontApi::with_sample_catalog().with_cart_line(ProductId(3), 1);

        api.decrease_in_cart(ProductId(3)).await.unwrap();

        assert_eq!(api.cart_quantity(ProductId(3)), Some(0));
        assert_eq!(api.cart().await.unwrap()[0].quantity, 0);
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded() {
        let api = MockStorefrontApi::new();
        api.fail(Endpoint::Brands, ApiError::Transport("down".into()));

        assert!(api.brands().await.is_err());
        assert_eq!(api.calls(), vec![ApiCall::Brands]);

        api.clear_failures();
        assert_eq!(api.brands().await, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_login_checks_password() {
        let api = MockStorefrontApi::new().with_user("alice", "pw");

        assert_eq!(
            api.login(&Credentials::new("alice", "pw")).await,
            Ok("token-alice".to_string())
        );
        let error = api.login(&Credentials::new("alice", "nope")).await.unwrap_err();
        assert!(error.has_status(400));
    }
}
