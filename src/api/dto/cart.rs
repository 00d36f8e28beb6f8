//! Cart request and response DTOs.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{CartLine, CartView};

/// `POST /api/cart`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: i64,
    pub product_id: i64,
    pub product_title: String,
    pub product_price: f64,
    pub quantity: i32,
    pub subtotal: f64,
    pub added_at: jiff::Timestamp,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub user_id: i64,
    pub items: Vec<CartItemResponse>,
    pub total_items: i64,
    pub total_price: f64,
}

/// Amounts are computed exactly and only converted for the wire. Going
/// through the decimal rendering yields the nearest `f64`.
fn amount(value: &BigDecimal) -> f64 {
    value.to_string().parse().unwrap_or_default()
}

impl From<CartLine> for CartItemResponse {
    fn from(line: CartLine) -> Self {
        Self {
            subtotal: amount(&line.subtotal()),
            product_price: amount(&line.product_price),
            id: line.id,
            product_id: line.product_id,
            product_title: line.product_title,
            quantity: line.quantity,
            added_at: line.added_at,
        }
    }
}

impl From<CartView> for CartResponse {
    fn from(cart: CartView) -> Self {
        Self {
            total_items: cart.total_items(),
            total_price: amount(&cart.total_price()),
            user_id: cart.user_id,
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
        }
    }
}
