use crate::controller::ViewController;
use crate::domain::RawListing;
use crate::map::SnapshotMap;
use crate::router::AppState;
use astra::{Body, Request, Response};
use http::Method;
use serde_json::json;
use std::io::Read;

pub fn sample_raw() -> Vec<RawListing> {
    vec![
        RawListing::from_value(
            "1",
            json!({
                "name": "Beaver Hill",
                "address": "340 E Beaver Ave",
                "rent": 800,
                "bedrooms": 2,
                "distance": 0.5,
                "rating": 4.5,
                "reviews": 12,
                "amenities": ["Gym"]
            }),
        ),
        RawListing::from_value(
            "2",
            json!({
                "name": "The Metropolitan",
                "address": "400 W College Ave",
                "rent": null,
                "distance": 0.2,
                "featured": true,
                "coordinates": [40.795, -77.862]
            }),
        ),
        RawListing::from_value(
            "3",
            json!({ "name": "Park Crest", "rent": 600, "bedrooms": 1, "distance": 1.0 }),
        ),
    ]
}

/// App state with the map attached and `raw` already loaded.
pub fn ready_state(raw: Vec<RawListing>) -> AppState {
    let mut view = ViewController::new();
    view.attach_map(SnapshotMap::new())
        .expect("snapshot map initializes");
    let ticket = view.begin_fetch();
    view.complete_fetch(ticket, Ok(raw));
    AppState::new(view)
}

pub fn request(method: Method, uri: &str) -> Request {
    let mut req = Request::new(Body::empty());
    *req.method_mut() = method;
    *req.uri_mut() = uri.parse().unwrap();
    req
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
