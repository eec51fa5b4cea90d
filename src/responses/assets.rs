// responses/assets.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

const MAP_JS: &str = include_str!("../../static/map.js");
const MAIN_CSS: &str = include_str!("../../static/main.css");

/// Serves the bundled browser assets under `/static/`.
pub fn static_asset(path: &str) -> ResultResp {
    let (content_type, body) = match path {
        "/static/map.js" => ("application/javascript; charset=utf-8", MAP_JS),
        "/static/main.css" => ("text/css; charset=utf-8", MAIN_CSS),
        _ => return Err(ServerError::NotFound),
    };

    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type)
        .header("Cache-Control", "public, max-age=3600")
        .body(Body::from(body))
        .map_err(|e| ServerError::InternalError(e.to_string()))
}
