pub mod assets;
pub mod errors;
pub mod html;
pub mod json;

pub use assets::static_asset;
pub use errors::{error_to_response, ResultResp};

pub use html::{html_response, redirect};
pub use json::json_response;
