//! Local draft of the product list.

mod cache;
mod store;

pub use cache::{CacheError, DraftCache, FileCache, MemoryCache};
pub use store::{
    DraftError, DraftStore, IdStrategy, UnknownIdPolicy, UpsertOutcome, DEFAULT_CACHE_KEY,
};
