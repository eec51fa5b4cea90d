pub mod error;
pub mod list;
pub mod map;

pub use error::error_page;
pub use list::{list_page, ListPageVm};
pub use map::{map_page, MapPageVm};
