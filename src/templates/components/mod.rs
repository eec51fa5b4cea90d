pub mod card;
pub mod error;
pub mod filters;
pub mod panels;
pub mod rating;

pub use card::listing_card;
pub use error::error_body;
pub use filters::filter_form;
pub use panels::{detail_panel, hover_panel, similar_panel};
pub use rating::rating_stars;
