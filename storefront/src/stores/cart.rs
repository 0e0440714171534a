//! Shopping cart store.
//!
//! The backend owns the cart. Every mutation sends exactly one request and
//! then, in the same effect, re-fetches the whole cart; the snapshot that
//! comes back replaces local state wholesale. No quantity arithmetic happens
//! on the client, so concurrent mutations resolve to whichever re-fetch lands
//! last.

use std::fmt;
use std::marker::PhantomData;

use storefront_api::{CartLine, CheckoutContact, OrderSummary, ProductId, StorefrontApi};
use storefront_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use storefront_macros::Action;

use crate::environment::StorefrontEnvironment;

/// Shown when the checkout relay rejects an order
pub const CHECKOUT_FAILED: &str = "Failed to place order, please try again";

/// Shown when checkout is attempted with nothing in the cart
pub const CART_EMPTY: &str = "Cart is empty";

/// Progress of the last checkout
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CheckoutStatus {
    /// No checkout attempted
    #[default]
    Idle,
    /// Order sent, waiting for the relay
    Submitting,
    /// Order accepted
    Submitted,
    /// Order not placed
    Failed(String),
}

/// Cart state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartState {
    /// Last snapshot from the backend
    pub lines: Vec<CartLine>,
    /// Fetch in flight
    pub loading: bool,
    /// Checkout progress
    pub checkout: CheckoutStatus,
}

impl CartState {
    /// Sum of quantities
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line totals at effective prices
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Line for a product
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }

    /// Units of a product in the cart
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.line(product_id).map_or(0, |line| line.quantity)
    }
}

/// Cart actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum CartAction {
    // ========== Commands ==========
    /// Add one unit of a product
    #[command]
    AddProduct {
        /// Product to add
        product_id: ProductId,
    },

    /// Drop a product's line
    #[command]
    RemoveProduct {
        /// Product to remove
        product_id: ProductId,
    },

    /// One more unit
    #[command]
    IncreaseProduct {
        /// Product to increase
        product_id: ProductId,
    },

    /// One unit fewer; the last unit removes the line
    #[command]
    DecreaseProduct {
        /// Product to decrease
        product_id: ProductId,
    },

    /// Empty the cart
    #[command]
    ClearCart,

    /// Fetch the cart
    #[command]
    GetProductsFromCart,

    /// Place an order for the current cart
    #[command]
    Checkout {
        /// Customer contact
        contact: CheckoutContact,
    },

    /// Forget the last checkout outcome
    #[command]
    ResetCheckout,

    // ========== Events ==========
    /// A cart snapshot arrived; empty when the fetch failed
    #[event]
    CartLoaded {
        /// Lines as sent by the backend
        lines: Vec<CartLine>,
    },

    /// The relay accepted the order and the cart was refreshed
    #[event]
    CheckoutCompleted {
        /// Cart after clearing
        lines: Vec<CartLine>,
    },

    /// The relay rejected the order
    #[event]
    CheckoutFailed {
        /// Error message
        error: String,
    },
}

/// A single cart mutation request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CartMutation {
    Add(ProductId),
    Remove(ProductId),
    Increase(ProductId),
    Decrease(ProductId),
    Clear,
}

impl fmt::Display for CartMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(id) => write!(f, "add {id}"),
            Self::Remove(id) => write!(f, "remove {id}"),
            Self::Increase(id) => write!(f, "increase {id}"),
            Self::Decrease(id) => write!(f, "decrease {id}"),
            Self::Clear => f.write_str("clear"),
        }
    }
}

async fn fetch_cart<B: StorefrontApi>(api: &B) -> Vec<CartLine> {
    api.cart().await.unwrap_or_else(|error| {
        tracing::warn!(%error, "Failed to load cart");
        Vec::new()
    })
}

/// Cart reducer
#[derive(Debug, Clone)]
pub struct CartReducer<B> {
    _phantom: PhantomData<B>,
}

impl<B> CartReducer<B> {
    /// Create a new cart reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<B> Default for CartReducer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> CartReducer<B>
where
    B: StorefrontApi + Clone + 'static,
{
    /// Send the mutation, then re-fetch regardless of its outcome
    fn mutate(
        state: &mut CartState,
        mutation: CartMutation,
        env: &StorefrontEnvironment<B>,
    ) -> SmallVec<[Effect<CartAction>; 4]> {
        state.loading = true;
        let api = env.api.clone();

        smallvec![async_effect! {
            let result = match mutation {
                CartMutation::Add(id) => api.add_to_cart(id).await,
                CartMutation::Remove(id) => api.remove_from_cart(id).await,
                CartMutation::Increase(id) => api.increase_in_cart(id).await,
                CartMutation::Decrease(id) => api.decrease_in_cart(id).await,
                CartMutation::Clear => api.clear_cart().await,
            };
            if let Err(error) = result {
                tracing::warn!(%error, %mutation, "Cart mutation failed");
            }

            Some(CartAction::CartLoaded { lines: fetch_cart(&api).await })
        }]
    }

    fn checkout(
        state: &mut CartState,
        contact: CheckoutContact,
        env: &StorefrontEnvironment<B>,
    ) -> SmallVec<[Effect<CartAction>; 4]> {
        if state.checkout == CheckoutStatus::Submitting {
            tracing::debug!("Checkout already in flight");
            return SmallVec::new();
        }

        let Some(order) = OrderSummary::from_cart(contact, &state.lines, env.clock.now()) else {
            state.checkout = CheckoutStatus::Failed(CART_EMPTY.to_string());
            return SmallVec::new();
        };

        state.checkout = CheckoutStatus::Submitting;
        let api = env.api.clone();

        smallvec![async_effect! {
            if let Err(error) = api.submit_order(&order).await {
                tracing::warn!(%error, "Checkout failed");
                return Some(CartAction::CheckoutFailed { error: error.to_string() });
            }

            tracing::info!(items = order.total_items, total = order.total_price, "Order placed");
            if let Err(error) = api.clear_cart().await {
                tracing::warn!(%error, "Failed to clear cart after checkout");
            }
            Some(CartAction::CheckoutCompleted { lines: fetch_cart(&api).await })
        }]
    }
}

fn keep_positive(lines: Vec<CartLine>) -> Vec<CartLine> {
    lines.into_iter().filter(|line| line.quantity > 0).collect()
}

impl<B> Reducer for CartReducer<B>
where
    B: StorefrontApi + Clone + 'static,
{
    type State = CartState;
    type Action = CartAction;
    type Environment = StorefrontEnvironment<B>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            CartAction::AddProduct { product_id } => {
                Self::mutate(state, CartMutation::Add(product_id), env)
            },
            CartAction::RemoveProduct { product_id } => {
                Self::mutate(state, CartMutation::Remove(product_id), env)
            },
            CartAction::IncreaseProduct { product_id } => {
                Self::mutate(state, CartMutation::Increase(product_id), env)
            },
            CartAction::DecreaseProduct { product_id } => {
                let mutation = if state.quantity_of(product_id) <= 1 {
                    CartMutation::Remove(product_id)
                } else {
                    CartMutation::Decrease(product_id)
                };
                Self::mutate(state, mutation, env)
            },
            CartAction::ClearCart => Self::mutate(state, CartMutation::Clear, env),

            CartAction::GetProductsFromCart => {
                state.loading = true;
                let api = env.api.clone();
                smallvec![async_effect! {
                    Some(CartAction::CartLoaded { lines: fetch_cart(&api).await })
                }]
            },

            CartAction::Checkout { contact } => Self::checkout(state, contact, env),

            CartAction::ResetCheckout => {
                state.checkout = CheckoutStatus::Idle;
                SmallVec::new()
            },

            // ========== Events ==========
            CartAction::CartLoaded { lines } => {
                state.lines = keep_positive(lines);
                state.loading = false;
                SmallVec::new()
            },

            CartAction::CheckoutCompleted { lines } => {
                state.lines = keep_positive(lines);
                state.checkout = CheckoutStatus::Submitted;
                SmallVec::new()
            },

            CartAction::CheckoutFailed { .. } => {
                state.checkout = CheckoutStatus::Failed(CHECKOUT_FAILED.to_string());
                SmallVec::new()
            },
        }
    }
}
