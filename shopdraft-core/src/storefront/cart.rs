//! Shopping cart for the storefront.
//!
//! The cart lives only for the current session and is never persisted.
//! Entries reference products by id; prices are looked up in the catalog.

use serde::Serialize;
use thiserror::Error;

use super::catalog::Catalog;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Your cart is empty")]
    Empty,
    #[error("Product not in catalog: {0}")]
    UnknownProduct(i64),
    #[error("Quantity too large for product {0}")]
    QuantityTooLarge(i64),
}

/// One product in the cart. `quantity` is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds one unit of a catalog product.
    pub fn add(&mut self, catalog: &Catalog, product_id: i64) -> Result<(), CartError> {
        self.add_quantity(catalog, product_id, 1)
    }

    /// Adds `quantity` units of a catalog product. Adding zero is a no-op.
    pub fn add_quantity(
        &mut self,
        catalog: &Catalog,
        product_id: i64,
        quantity: u32,
    ) -> Result<(), CartError> {
        if catalog.get(product_id).is_none() {
            return Err(CartError::UnknownProduct(product_id));
        }
        if quantity == 0 {
            return Ok(());
        }

        match self.entry_mut(product_id) {
            Some(entry) => {
                entry.quantity = entry
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::QuantityTooLarge(product_id))?
            }
            None => self.entries.push(CartEntry {
                product_id,
                quantity,
            }),
        }
        Ok(())
    }

    /// Adds one unit to an existing entry; stays put at `u32::MAX`.
    pub fn increase(&mut self, product_id: i64) {
        if let Some(entry) = self.entry_mut(product_id) {
            entry.quantity = entry.quantity.saturating_add(1);
        }
    }

    /// Takes one unit away; the last unit removes the entry.
    pub fn decrease(&mut self, product_id: i64) {
        match self.entry_mut(product_id) {
            Some(entry) if entry.quantity > 1 => entry.quantity -= 1,
            Some(_) => self.remove(product_id),
            None => {}
        }
    }

    pub fn remove(&mut self, product_id: i64) {
        self.entries.retain(|e| e.product_id != product_id);
    }

    /// Total number of units.
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Total price of all entries whose product is still in `catalog`.
    pub fn total(&self, catalog: &Catalog) -> f64 {
        self.entries
            .iter()
            .filter_map(|e| catalog.get(e.product_id).map(|p| p.price * e.quantity as f64))
            .sum()
    }

    fn entry_mut(&mut self, product_id: i64) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_increments_existing_entry() {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();

        cart.add(&catalog, 1).unwrap();
        cart.add(&catalog, 1).unwrap();
        cart.add(&catalog, 3).unwrap();

        assert_eq!(cart.entries().len(), 2);
        assert_eq!(cart.entries()[0].quantity, 2);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_unknown_product() {
        let mut cart = Cart::new();
        let err = cart.add(&Catalog::sample(), 99).unwrap_err();
        assert_eq!(err, CartError::UnknownProduct(99));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_past_u32_max_is_rejected() {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();
        cart.add_quantity(&catalog, 1, u32::MAX).unwrap();

        assert_eq!(cart.add(&catalog, 1), Err(CartError::QuantityTooLarge(1)));
        assert_eq!(cart.entries()[0].quantity, u32::MAX);

        cart.increase(1);
        assert_eq!(cart.entries()[0].quantity, u32::MAX);

        cart.add(&catalog, 2).unwrap();
        assert_eq!(cart.item_count(), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_decrease_removes_last_unit() {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();
        cart.add_quantity(&catalog, 2, 2).unwrap();

        cart.decrease(2);
        assert_eq!(cart.entries()[0].quantity, 1);

        cart.decrease(2);
        assert!(cart.is_empty());

        cart.decrease(2);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_increase_and_remove() {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();
        cart.add(&catalog, 3).unwrap();

        cart.increase(3);
        cart.increase(4);
        assert_eq!(cart.item_count(), 2);

        cart.remove(3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total() {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();
        cart.add_quantity(&catalog, 1, 2).unwrap();
        cart.add(&catalog, 3).unwrap();

        assert_eq!(cart.total(&catalog), 2.0 * 120.0 + 25.0);
        assert_eq!(Cart::new().total(&catalog), 0.0);
    }
}
