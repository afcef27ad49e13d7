use std::fmt;

use super::cart::{Cart, CartError};
use super::catalog::Catalog;
use crate::models::format_price;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub line_total: f64,
}

/// A checked-out cart, ready to be sent as a chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub lines: Vec<OrderLine>,
    pub total: f64,
}

impl Order {
    pub fn from_cart(cart: &Cart, catalog: &Catalog) -> Result<Self, CartError> {
        if cart.is_empty() {
            return Err(CartError::Empty);
        }

        let mut lines = Vec::with_capacity(cart.entries().len());
        for entry in cart.entries() {
            let product = catalog
                .get(entry.product_id)
                .ok_or(CartError::UnknownProduct(entry.product_id))?;
            lines.push(OrderLine {
                name: product.name.clone(),
                quantity: entry.quantity,
                line_total: product.price * entry.quantity as f64,
            });
        }

        let total = lines.iter().map(|l| l.line_total).sum();
        Ok(Self { lines, total })
    }

    /// Plain-text order summary.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// `wa.me` link that opens a chat with `phone_number` prefilled with the order.
    pub fn whatsapp_url(&self, phone_number: &str) -> String {
        let digits: String = phone_number.chars().filter(char::is_ascii_digit).collect();
        format!(
            "https://wa.me/{}?text={}",
            digits,
            urlencoding::encode(&self.message())
        )
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*New order*")?;
        writeln!(f)?;
        for line in &self.lines {
            writeln!(f, "• {}", line.name)?;
            writeln!(f, "  Quantity: {}", line.quantity)?;
            writeln!(f, "  Price: ${}", format_price(line.line_total))?;
            writeln!(f)?;
        }
        write!(f, "*Total: ${}*", format_price(self.total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();
        cart.add_quantity(&catalog, 1, 2).unwrap();
        cart.add(&catalog, 3).unwrap();
        Order::from_cart(&cart, &catalog).unwrap()
    }

    #[test]
    fn test_empty_cart_cannot_check_out() {
        let err = Order::from_cart(&Cart::new(), &Catalog::sample()).unwrap_err();
        assert_eq!(err, CartError::Empty);
    }

    #[test]
    fn test_order_lines_and_total() {
        let order = sample_order();
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].name, "Pizza Margherita");
        assert_eq!(order.lines[0].line_total, 240.0);
        assert_eq!(order.total, 265.0);
    }

    #[test]
    fn test_message() {
        let message = sample_order().message();
        assert!(message.starts_with("*New order*\n\n"));
        assert!(message.contains("• Pizza Margherita\n  Quantity: 2\n  Price: $240\n"));
        assert!(message.ends_with("*Total: $265*"));
    }

    #[test]
    fn test_whatsapp_url() {
        let url = sample_order().whatsapp_url("+52 963 387 0587");
        assert!(url.starts_with("https://wa.me/529633870587?text="));
        assert!(url.contains("%2ANew%20order%2A"));
        assert!(!url.contains(' '));
        assert!(!url.contains('\n'));
    }
}
