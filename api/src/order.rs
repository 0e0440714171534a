//! Checkout order summary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CartLine, ProductId};

/// How to reach the customer about an order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutContact {
    /// Customer name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Delivery address
    pub address: String,
    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One ordered product
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product identifier
    pub product_id: ProductId,
    /// Product name at order time
    pub name: String,
    /// Units ordered
    pub quantity: u32,
    /// Effective unit price at order time
    pub unit_price: f64,
    /// `unit_price * quantity`
    pub line_total: f64,
}

/// Order posted to the checkout relay
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Customer contact
    pub contact: CheckoutContact,
    /// Ordered products
    pub lines: Vec<OrderLine>,
    /// Sum of quantities
    pub total_items: u32,
    /// Sum of line totals
    pub total_price: f64,
    /// When the order was placed
    pub placed_at: DateTime<Utc>,
}

impl OrderSummary {
    /// Summarize the cart; `None` when the cart is empty
    #[must_use]
    pub fn from_cart(
        contact: CheckoutContact,
        cart: &[CartLine],
        placed_at: DateTime<Utc>,
    ) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }

        let lines: Vec<OrderLine> = cart
            .iter()
            .map(|line| OrderLine {
                product_id: line.product.id,
                name: line.product.name.clone(),
                quantity: line.quantity,
                unit_price: line.product.effective_price(),
                line_total: line.line_total(),
            })
            .collect();

        Some(Self {
            contact,
            total_items: lines.iter().map(|line| line.quantity).sum(),
            total_price: lines.iter().map(|line| line.line_total).sum(),
            lines,
            placed_at,
        })
    }
}
