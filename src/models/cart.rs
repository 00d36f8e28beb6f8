use bigdecimal::{BigDecimal, Zero};
use diesel::prelude::*;

/// Cart row as stored in the database
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::cart_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub product_title: String,
    pub product_price: BigDecimal,
    pub quantity: i32,
    pub added_at: jiff_diesel::Timestamp,
}

/// Insert model for a first add. A repeated add for the same pair only
/// increments `quantity` and keeps the stored title and price.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct NewCartItem {
    pub user_id: i64,
    pub product_id: i64,
    pub product_title: String,
    pub product_price: BigDecimal,
    pub quantity: i32,
}

/// One cart line, independent of the store it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub product_title: String,
    pub product_price: BigDecimal,
    pub quantity: i32,
    pub added_at: jiff::Timestamp,
}

impl CartLine {
    pub fn subtotal(&self) -> BigDecimal {
        &self.product_price * BigDecimal::from(self.quantity)
    }
}

impl From<CartItem> for CartLine {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            product_id: item.product_id,
            product_title: item.product_title,
            product_price: item.product_price,
            quantity: item.quantity,
            added_at: item.added_at.to_jiff(),
        }
    }
}

/// A user's cart with derived totals
#[derive(Debug, Clone)]
pub struct CartView {
    pub user_id: i64,
    pub items: Vec<CartLine>,
}

impl CartView {
    pub fn new(user_id: i64, items: Vec<CartLine>) -> Self {
        Self { user_id, items }
    }

    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|line| i64::from(line.quantity)).sum()
    }

    pub fn total_price(&self) -> BigDecimal {
        self.items
            .iter()
            .fold(BigDecimal::zero(), |acc, line| acc + line.subtotal())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn line(id: i64, product_id: i64, price: &str, quantity: i32) -> CartLine {
        CartLine {
            id,
            user_id: 1,
            product_id,
            product_title: format!("Product {}", product_id),
            product_price: BigDecimal::from_str(price).unwrap(),
            quantity,
            added_at: jiff::Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_subtotal_is_exact() {
        let line = line(1, 5, "999.99", 2);
        assert_eq!(line.subtotal(), BigDecimal::from_str("1999.98").unwrap());
    }

    #[test]
    fn test_totals() {
        let cart = CartView::new(1, vec![line(1, 5, "9.99", 3), line(2, 8, "0.10", 1)]);
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_price(), BigDecimal::from_str("30.07").unwrap());
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let cart = CartView::new(7, Vec::new());
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), BigDecimal::zero());
    }
}
