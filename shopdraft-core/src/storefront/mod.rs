//! Read-only storefront: published catalog, session cart and checkout.

mod cart;
mod catalog;
mod order;

pub use cart::{Cart, CartEntry, CartError};
pub use catalog::{fetch_catalog, Catalog, CatalogSource};
pub use order::{Order, OrderLine};
