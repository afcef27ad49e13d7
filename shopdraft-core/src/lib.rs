//! Shopdraft Core Library
//!
//! Product model, local draft and remote synchronization shared by the
//! shopdraft tools.

pub mod draft;
pub mod models;
pub mod storefront;
pub mod sync;

pub use draft::{
    CacheError, DraftCache, DraftError, DraftStore, FileCache, IdStrategy, MemoryCache,
    UnknownIdPolicy, UpsertOutcome, DEFAULT_CACHE_KEY,
};
pub use models::{
    Normalizer, Product, ProductFields, ProductForm, ValidationError, DEFAULT_PLACEHOLDER_IMAGE,
};
pub use storefront::{fetch_catalog, Cart, CartError, Catalog, CatalogSource, Order};
pub use sync::{
    Confirm, HttpRemote, Operation, RemoteStore, RemoteSync, StatusSink, SyncError, SyncOutcome,
    SyncStatus,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
