// src/tests/router_tests/list_tests.rs

use crate::controller::ViewController;
use crate::errors::ServerError;
use crate::router::{handle, AppState};
use crate::tests::utils::{body_string, location, ready_state, request, sample_raw};
use http::Method;
use scraper::{Html, Selector};

fn card_ids(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse("article.listing-card").unwrap();
    doc.select(&sel)
        .filter_map(|el| el.value().attr("data-id"))
        .map(str::to_string)
        .collect()
}

#[test]
fn list_shows_loading_until_fetch_lands() {
    let state = AppState::new(ViewController::new());
    let resp = handle(request(Method::GET, "/"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Loading apartments..."));
    assert!(card_ids(&body).is_empty());
}

#[test]
fn list_renders_every_listing_nearest_first() {
    let state = ready_state(sample_raw());
    let body = body_string(handle(request(Method::GET, "/"), &state).unwrap());

    assert_eq!(card_ids(&body), vec!["2", "1", "3"]);
    assert!(body.contains("Showing 3 of 3 apartments"));
    assert!(body.contains("Contact for price"));
    assert!(body.contains("Featured"));
}

#[test]
fn query_filters_apply_to_the_view() {
    let state = ready_state(sample_raw());
    let body = body_string(handle(request(Method::GET, "/?minRent=700"), &state).unwrap());

    assert_eq!(card_ids(&body), vec!["1"]);
    assert!(body.contains("Showing 1 of 3 apartments"));
    assert_eq!(state.view().unwrap().criteria().min_rent, Some(700.0));
    assert_eq!(state.view().unwrap().map().unwrap().len(), 1);
}

#[test]
fn search_and_sort_come_from_the_form() {
    let state = ready_state(sample_raw());
    let body = body_string(
        handle(request(Method::GET, "/?search=ave&sortBy=rent-high"), &state).unwrap(),
    );

    assert_eq!(card_ids(&body), vec!["1", "2"]);

    let doc = Html::parse_document(&body);
    let selected = Selector::parse("select[name=sortBy] option[selected]").unwrap();
    let value = doc
        .select(&selected)
        .next()
        .and_then(|el| el.value().attr("value"));
    assert_eq!(value, Some("rent-high"));
}

#[test]
fn no_matches_offers_clearing_filters() {
    let state = ready_state(sample_raw());
    let body = body_string(handle(request(Method::GET, "/?bedrooms=4"), &state).unwrap());

    assert!(card_ids(&body).is_empty());
    assert!(body.contains("No apartments match your filters."));
}

#[test]
fn clear_filters_resets_and_redirects_home() {
    let state = ready_state(sample_raw());
    handle(request(Method::GET, "/?maxDistance=0.3"), &state).unwrap();
    assert_eq!(state.view().unwrap().filtered().len(), 1);

    let resp = handle(request(Method::GET, "/filters/clear"), &state).unwrap();

    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/");
    assert!(state.view().unwrap().criteria().is_default());
    assert_eq!(state.view().unwrap().filtered().len(), 3);
}

#[test]
fn unknown_route_is_not_found() {
    let state = ready_state(sample_raw());
    let err = handle(request(Method::GET, "/nope"), &state).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));

    let resp = crate::responses::error_to_response(err);
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("Error 404"));
}
