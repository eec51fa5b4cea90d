pub mod filter;
pub mod listing;

pub use filter::{apply, FilterCriteria, FilterField, SortBy};
pub use listing::{LatLng, Listing, ListingId, RawListing};
