pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{listing_card, rating_stars};
pub use layouts::desktop::desktop_layout;

/// Percent-encodes a listing id for use inside a query string.
pub fn encode_id(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes()).collect()
}
