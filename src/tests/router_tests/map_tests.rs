// src/tests/router_tests/map_tests.rs

use crate::controller::ViewController;
use crate::domain::{ListingId, RawListing};
use crate::errors::ServerError;
use crate::map::{SnapshotMap, Viewport, FOCUS_ZOOM};
use crate::router::{handle, AppState};
use crate::tests::utils::{body_string, location, ready_state, request, sample_raw};
use http::Method;
use scraper::{Html, Selector};
use serde_json::{json, Value};

fn handle_of(state: &AppState, id: &str) -> u64 {
    let view = state.view().unwrap();
    view.map()
        .and_then(|sync| sync.placed(&ListingId::from(id)))
        .map(|placed| placed.handle.0)
        .expect("listing has a marker")
}

fn map_json(state: &AppState) -> Value {
    let body = body_string(handle(request(Method::GET, "/api/map"), state).unwrap());
    serde_json::from_str(&body).unwrap()
}

#[test]
fn api_reports_one_marker_per_listing_plus_reference() {
    let state = ready_state(sample_raw());
    let json = map_json(&state);

    assert_eq!(json["ready"], true);
    assert_eq!(json["map"]["markers"].as_array().unwrap().len(), 4);
    assert_eq!(json["map"]["viewport"]["mode"], "fit");
    assert_eq!(json["selected"], Value::Null);
}

#[test]
fn marker_click_selects_and_redirects_to_map() {
    let state = ready_state(sample_raw());
    let h = handle_of(&state, "1");

    let resp = handle(
        request(Method::POST, &format!("/map/marker?handle={h}&event=click")),
        &state,
    )
    .unwrap();

    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/map");
    assert_eq!(map_json(&state)["selected"], "1");

    let page = body_string(handle(request(Method::GET, "/map"), &state).unwrap());
    assert!(page.contains("panel detail"));
    assert!(page.contains("Beaver Hill"));
}

#[test]
fn hover_panel_hides_while_something_is_selected() {
    let state = ready_state(sample_raw());
    let h1 = handle_of(&state, "1");
    let h3 = handle_of(&state, "3");

    handle(request(Method::POST, &format!("/map/marker?handle={h3}&event=hover")), &state).unwrap();
    let page = body_string(handle(request(Method::GET, "/map"), &state).unwrap());
    assert!(page.contains("panel hover"));
    assert!(page.contains("Park Crest"));

    handle(request(Method::POST, &format!("/map/marker?handle={h1}&event=click")), &state).unwrap();
    let json = map_json(&state);
    assert_eq!(json["selected"], "1");
    assert_eq!(json["hovered"], Value::Null);

    handle(request(Method::POST, &format!("/map/marker?handle={h3}&event=hover")), &state).unwrap();
    let page = body_string(handle(request(Method::GET, "/map"), &state).unwrap());
    assert!(page.contains("panel detail"));
    assert!(!page.contains("panel hover"));
    assert_eq!(map_json(&state)["hovered"], "3");
}

#[test]
fn closing_detail_keeps_markers_and_filters() {
    let state = ready_state(sample_raw());
    handle(request(Method::GET, "/map?maxRent=900"), &state).unwrap();
    let before = map_json(&state)["map"]["markers"].clone();

    handle(request(Method::POST, "/map/details?id=1"), &state).unwrap();
    assert_eq!(map_json(&state)["selected"], "1");

    let resp = handle(request(Method::POST, "/map/detail/close"), &state).unwrap();
    assert_eq!(location(&resp), "/map?maxRent=900");

    let after = map_json(&state);
    assert_eq!(after["selected"], Value::Null);
    assert_eq!(after["map"]["markers"], before);
}

#[test]
fn filtering_out_the_selection_clears_it() {
    let state = ready_state(sample_raw());
    handle(request(Method::POST, "/map/details?id=3"), &state).unwrap();

    handle(request(Method::GET, "/map?minRent=700"), &state).unwrap();

    let json = map_json(&state);
    assert_eq!(json["selected"], Value::Null);
    assert_eq!(json["map"]["markers"].as_array().unwrap().len(), 2);
}

#[test]
fn center_zooms_on_listing() {
    let state = ready_state(sample_raw());
    handle(request(Method::POST, "/map/center?id=2"), &state).unwrap();

    let view = state.view().unwrap();
    let sync = view.map().unwrap();
    let placed = sync.placed(&ListingId::from("2")).unwrap();
    assert_eq!(
        sync.map().viewport(),
        &Viewport::Center {
            center: placed.position,
            zoom: FOCUS_ZOOM
        }
    );
    assert_eq!(sync.map().open_popup_handle(), Some(placed.handle));
}

#[test]
fn map_click_clears_hover() {
    let state = ready_state(sample_raw());
    let h = handle_of(&state, "2");
    handle(request(Method::POST, &format!("/map/marker?handle={h}&event=hover")), &state).unwrap();
    assert_eq!(map_json(&state)["hovered"], "2");

    handle(request(Method::POST, "/map/click"), &state).unwrap();
    assert_eq!(map_json(&state)["hovered"], Value::Null);
}

#[test]
fn bad_marker_requests_are_rejected() {
    let state = ready_state(sample_raw());

    let missing = handle(request(Method::POST, "/map/marker?event=click"), &state).unwrap_err();
    assert!(matches!(missing, ServerError::BadRequest(_)));

    let not_number =
        handle(request(Method::POST, "/map/marker?handle=x&event=click"), &state).unwrap_err();
    assert!(matches!(not_number, ServerError::BadRequest(_)));

    let bad_event =
        handle(request(Method::POST, "/map/marker?handle=1&event=drag"), &state).unwrap_err();
    assert!(matches!(bad_event, ServerError::BadRequest(_)));
}

#[test]
fn unavailable_map_stays_loading_while_list_works() {
    let mut view = ViewController::new();
    assert!(view.attach_map(SnapshotMap::unavailable()).is_err());
    let ticket = view.begin_fetch();
    view.complete_fetch(ticket, Ok(sample_raw()));
    let state = AppState::new(view);

    let page = body_string(handle(request(Method::GET, "/map"), &state).unwrap());
    assert!(page.contains("Loading map..."));
    assert!(!page.contains("map-state"));
    assert_eq!(map_json(&state)["ready"], false);

    let list = body_string(handle(request(Method::GET, "/"), &state).unwrap());
    assert!(list.contains("Showing 3 of 3 apartments"));
}

#[test]
fn detail_lists_similar_apartments_by_bedrooms() {
    let raw = vec![
        RawListing::from_value("a", json!({ "name": "Alder", "bedrooms": 2, "distance": 0.3 })),
        RawListing::from_value("b", json!({ "name": "Birch", "bedrooms": 2, "distance": 0.1 })),
        RawListing::from_value("c", json!({ "name": "Cedar", "bedrooms": 1, "distance": 0.2 })),
    ];
    let state = ready_state(raw);
    handle(request(Method::POST, "/map/details?id=a"), &state).unwrap();

    let page = body_string(handle(request(Method::GET, "/map"), &state).unwrap());
    let doc = Html::parse_document(&page);
    let sel = Selector::parse("section.similar li.similar-item").unwrap();
    let ids: Vec<&str> = doc
        .select(&sel)
        .filter_map(|el| el.value().attr("data-id"))
        .collect();
    assert_eq!(ids, vec!["b"]);
    assert!(page.contains("/map/details?id=b"));

    handle(request(Method::POST, "/map/details?id=c"), &state).unwrap();
    let page = body_string(handle(request(Method::GET, "/map"), &state).unwrap());
    assert!(page.contains("No similar apartments found"));
}

#[test]
fn out_of_range_filters_do_not_rebuild_markers() {
    let state = ready_state(sample_raw());
    handle(request(Method::GET, "/map?minRent=NaN&maxDistance=inf"), &state).unwrap();
    let before = handle_of(&state, "1");

    handle(request(Method::GET, "/map?minRent=NaN&maxDistance=inf"), &state).unwrap();
    handle(request(Method::GET, "/map?maxRent=-1"), &state).unwrap();

    assert_eq!(handle_of(&state, "1"), before);
    assert!(state.view().unwrap().criteria().is_default());
    assert_eq!(map_json(&state)["map"]["markers"].as_array().unwrap().len(), 4);
}

#[test]
fn map_script_and_styles_are_served() {
    let state = ready_state(sample_raw());

    let js = handle(request(Method::GET, "/static/map.js"), &state).unwrap();
    assert_eq!(js.status(), 200);
    assert_eq!(
        js.headers().get("Content-Type").unwrap(),
        "application/javascript; charset=utf-8"
    );
    assert!(body_string(js).contains("/map/marker?handle="));

    let css = handle(request(Method::GET, "/static/main.css"), &state).unwrap();
    assert_eq!(css.status(), 200);

    let missing = handle(request(Method::GET, "/static/nope.js"), &state).unwrap_err();
    assert!(matches!(missing, ServerError::NotFound));
}

#[test]
fn centering_from_the_list_marks_the_map_tab_active() {
    let state = ready_state(sample_raw());
    handle(request(Method::POST, "/map/center?id=1"), &state).unwrap();

    let page = body_string(handle(request(Method::GET, "/map"), &state).unwrap());
    let doc = Html::parse_document(&page);
    let sel = Selector::parse("nav.tabs a.tab.active").unwrap();
    let active: Vec<&str> = doc
        .select(&sel)
        .filter_map(|el| el.value().attr("href"))
        .collect();
    assert_eq!(active, vec!["/map"]);
}
