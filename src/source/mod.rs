mod documents;
mod firestore;

pub use documents::DocumentStore;
pub use firestore::FirestoreSource;

use crate::domain::RawListing;
use thiserror::Error;

/// Collection the listings live in.
pub const DEFAULT_COLLECTION: &str = "testApartments";

/// Errors from reading the document store. Every variant is recoverable: the
/// view falls back to an empty listing set.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Read side of the document store.
pub trait ListingSource: Send + Sync {
    /// Every record in `collection`, in no particular order.
    fn fetch_all(&self, collection: &str) -> Result<Vec<RawListing>, FetchError>;
}
