//! HTTP client for the storefront backend

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::account::{Credentials, LoginResponse, ProfileUpdate, Registration, UserProfile};
use crate::backend::StorefrontApi;
use crate::error::{ApiError, ApiResult};
use crate::order::OrderSummary;
use crate::session::{TokenStore, UnauthorizedHandler};
use crate::types::{Brand, CartLine, Category, Product, ProductId, ProductPage, ProductQuery, SubCategory};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Storefront API client
///
/// Every request carries `Authorization: Bearer <token>` when the token
/// store holds one. A `401` answer clears the token and invokes the
/// unauthorized handler before the error is returned.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    on_unauthorized: Arc<dyn UnauthorizedHandler>,
}

impl ApiClient {
    /// Create a client for `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if `base_url` is not an absolute
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
        on_unauthorized: Arc<dyn UnauthorizedHandler>,
    ) -> ApiResult<Self> {
        let url = Url::parse(base_url).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidRequest(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            on_unauthorized,
        })
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{path}", self.base_url));
        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request; `Ok(None)` means `204 No Content`
    async fn execute(&self, builder: RequestBuilder) -> ApiResult<Option<Response>> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "Backend responded");

        match status {
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(url = %response.url(), "Unauthorized, clearing session");
                self.tokens.clear();
                self.on_unauthorized.on_unauthorized();
                Err(ApiError::Unauthorized)
            },
            status if status.is_success() => Ok(Some(response)),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }

    /// Decode a JSON body; no content and empty bodies decode as `T::default()`
    async fn fetch<T>(&self, builder: RequestBuilder) -> ApiResult<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.execute(builder).await? {
            Some(response) => decode_or_default(response).await,
            None => Ok(T::default()),
        }
    }

    /// Decode a JSON body that must be present
    async fn fetch_required<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self
            .execute(builder)
            .await?
            .ok_or_else(|| ApiError::Decode("expected a response body".to_string()))?;

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a mutation and ignore the response body
    async fn command(&self, builder: RequestBuilder) -> ApiResult<()> {
        self.execute(builder).await.map(|_| ())
    }
}

async fn decode_or_default<T>(response: Response) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

fn profile_form(update: &ProfileUpdate) -> ApiResult<Form> {
    let mut form = Form::new();
    for (name, value) in update.text_fields() {
        form = form.text(name, value);
    }

    if let Some(avatar) = &update.avatar {
        let part = Part::bytes(avatar.bytes.clone())
            .file_name(avatar.file_name.clone())
            .mime_str(&avatar.content_type)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        form = form.part("avatar", part);
    }

    Ok(form)
}

impl StorefrontApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> ApiResult<String> {
        let response: LoginResponse = self
            .fetch_required(self.request(Method::POST, "/Account/login").json(credentials))
            .await?;
        Ok(response.token)
    }

    async fn register(&self, registration: &Registration) -> ApiResult<()> {
        self.command(self.request(Method::POST, "/Account/register").json(registration))
            .await
    }

    async fn filtered_products(&self, query: &ProductQuery) -> ApiResult<ProductPage> {
        self.fetch(
            self.request(Method::GET, "/Product/filtered")
                .query(&query.to_params()),
        )
        .await
    }

    async fn home_products(&self, page_size: u32) -> ApiResult<Vec<Product>> {
        self.fetch(
            self.request(Method::GET, "/Product")
                .query(&[("pageSize", page_size)]),
        )
        .await
    }

    async fn search_products(&self, search: &str) -> ApiResult<Vec<Product>> {
        self.fetch(
            self.request(Method::GET, "/Product/search")
                .query(&[("name", search)]),
        )
        .await
    }

    async fn brands(&self) -> ApiResult<Vec<Brand>> {
        self.fetch(self.request(Method::GET, "/Brand")).await
    }

    async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.fetch(self.request(Method::GET, "/Category")).await
    }

    async fn sub_categories(&self) -> ApiResult<Vec<SubCategory>> {
        self.fetch(self.request(Method::GET, "/SubCategory")).await
    }

    async fn category_tree(&self) -> ApiResult<Vec<Category>> {
        self.fetch(self.request(Method::GET, "/Category/with-subcategories"))
            .await
    }

    async fn cart(&self) -> ApiResult<Vec<CartLine>> {
        self.fetch(self.request(Method::GET, "/Cart")).await
    }

    async fn add_to_cart(&self, product_id: ProductId) -> ApiResult<()> {
        self.command(self.request(Method::POST, &format!("/Cart/add/{product_id}")))
            .await
    }

    async fn remove_from_cart(&self, product_id: ProductId) -> ApiResult<()> {
        self.command(self.request(Method::DELETE, &format!("/Cart/remove/{product_id}")))
            .await
    }

    async fn increase_in_cart(&self, product_id: ProductId) -> ApiResult<()> {
        self.command(self.request(Method::PUT, &format!("/Cart/increase/{product_id}")))
            .await
    }

    async fn decrease_in_cart(&self, product_id: ProductId) -> ApiResult<()> {
        self.command(self.request(Method::PUT, &format!("/Cart/decrease/{product_id}")))
            .await
    }

    async fn clear_cart(&self) -> ApiResult<()> {
        self.command(self.request(Method::DELETE, "/Cart/clear")).await
    }

    async fn profile(&self) -> ApiResult<UserProfile> {
        self.fetch(self.request(Method::GET, "/User/profile")).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<()> {
        let form = profile_form(update)?;
        self.command(self.request(Method::PUT, "/User/profile").multipart(form))
            .await
    }

    async fn submit_order(&self, order: &OrderSummary) -> ApiResult<()> {
        self.command(self.request(Method::POST, "/Order/checkout").json(order))
            .await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
