use crate::controller::{Tab, ViewController};
use crate::domain::{FilterCriteria, ListingId};
use crate::errors::ServerError;
use crate::map::{
    MapSnapshot, MarkerEvent, MarkerEventKind, MarkerHandle, SnapshotMap, SIMILAR_LIMIT,
};
use crate::responses::{html_response, json_response, redirect, static_asset, ResultResp};
use crate::templates::pages::{list_page, map_page, ListPageVm, MapPageVm};
use astra::Request;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub type View = ViewController<SnapshotMap>;

/// Shared between astra workers. The mutex makes every interaction run to
/// completion before the next one starts.
pub struct AppState {
    view: Mutex<View>,
}

impl AppState {
    pub fn new(view: View) -> Self {
        Self {
            view: Mutex::new(view),
        }
    }

    pub fn view(&self) -> Result<MutexGuard<'_, View>, ServerError> {
        self.view
            .lock()
            .map_err(|_| ServerError::InternalError("view state poisoned".into()))
    }
}

/// What the browser map script needs to draw the current state.
#[derive(Debug, Serialize)]
pub struct MapState {
    pub ready: bool,
    pub map: Option<MapSnapshot>,
    pub selected: Option<ListingId>,
    pub hovered: Option<ListingId>,
}

impl MapState {
    fn of(view: &View) -> Self {
        match view.map() {
            Some(sync) => Self {
                ready: true,
                map: Some(sync.map().snapshot()),
                selected: sync.selected().map(|l| l.id.clone()),
                hovered: sync.hovered().map(|l| l.id.clone()),
            },
            None => Self {
                ready: false,
                map: None,
                selected: None,
                hovered: None,
            },
        }
    }
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();
    let params = parse_query(&req);

    match (method, path) {
        ("GET", "/") => list_view(state, &params),
        ("GET", "/map") => map_view(state, &params),
        ("GET", "/api/map") => json_response(&MapState::of(&*state.view()?)),
        ("GET", "/filters/clear") => {
            state.view()?.clear_filters();
            redirect("/")
        }
        ("GET", p) if p.starts_with("/static/") => static_asset(p),

        ("POST", "/map/marker") => {
            let handle = required(&params, "handle")?
                .parse::<u64>()
                .map(MarkerHandle)
                .map_err(|_| ServerError::BadRequest("handle must be a number".into()))?;
            let kind = match required(&params, "event")? {
                "click" => MarkerEventKind::Click,
                "hover" => MarkerEventKind::Hover,
                other => return Err(ServerError::BadRequest(format!("unknown event {other}"))),
            };
            with_map(state, |view| {
                if let Some(sync) = view.map_mut() {
                    sync.handle_event(MarkerEvent { handle, kind });
                }
            })
        }
        ("POST", "/map/details") => {
            let id = ListingId::from(required(&params, "id")?);
            with_map(state, |view| {
                if let Some(sync) = view.map_mut() {
                    sync.view_details(&id);
                }
            })
        }
        ("POST", "/map/center") => {
            let id = ListingId::from(required(&params, "id")?);
            with_map(state, |view| {
                view.set_tab(Tab::Map);
                if let Some(sync) = view.map_mut() {
                    sync.center_on(&id);
                }
            })
        }
        ("POST", "/map/detail/close") => with_map(state, |view| {
            if let Some(sync) = view.map_mut() {
                sync.close_detail();
            }
        }),
        ("POST", "/map/hover/close") => with_map(state, |view| {
            if let Some(sync) = view.map_mut() {
                sync.close_hover();
            }
        }),
        ("POST", "/map/click") => with_map(state, |view| {
            if let Some(sync) = view.map_mut() {
                sync.map_clicked();
            }
        }),

        _ => Err(ServerError::NotFound),
    }
}

/// Recomputes only when the criteria actually changed, so marker handles stay
/// valid across plain page reloads.
fn apply_params(view: &mut View, params: &HashMap<String, String>) {
    let criteria = FilterCriteria::from_params(params);
    if *view.criteria() != criteria {
        view.set_criteria(criteria);
    }
}

fn list_view(state: &AppState, params: &HashMap<String, String>) -> ResultResp {
    let mut view = state.view()?;
    apply_params(&mut view, params);
    view.set_tab(Tab::List);

    html_response(list_page(&ListPageVm {
        tab: view.tab(),
        loading: view.is_loading(),
        criteria: view.criteria(),
        listings: view.filtered(),
        total: view.listings().len(),
    }))
}

fn map_view(state: &AppState, params: &HashMap<String, String>) -> ResultResp {
    let mut view = state.view()?;
    apply_params(&mut view, params);
    view.set_tab(Tab::Map);

    let map_state = match view.map() {
        Some(_) => Some(
            serde_json::to_string(&MapState::of(&view))
                .map_err(|e| ServerError::InternalError(format!("serialize failed: {e}")))?,
        ),
        None => None,
    };
    let sync = view.map();

    html_response(map_page(&MapPageVm {
        tab: view.tab(),
        loading: view.is_loading(),
        criteria: view.criteria(),
        shown: view.filtered().len(),
        total: view.listings().len(),
        map_state,
        selected: sync.and_then(|s| s.selected()),
        hover: sync.and_then(|s| s.hover_panel()),
        similar: sync.map(|s| s.similar(SIMILAR_LIMIT)).unwrap_or_default(),
    }))
}

/// Runs a map interaction, then sends the browser back to the map page with
/// the current filters.
fn with_map<F>(state: &AppState, f: F) -> ResultResp
where
    F: FnOnce(&mut View),
{
    let mut view = state.view()?;
    f(&mut *view);

    let query = view.criteria().to_query();
    if query.is_empty() {
        redirect("/map")
    } else {
        redirect(&format!("/map?{query}"))
    }
}

fn required<'a>(params: &'a HashMap<String, String>, key: &str) -> Result<&'a str, ServerError> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServerError::BadRequest(format!("missing {key}")))
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    match req.uri().query() {
        Some(q) => url::form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect(),
        None => HashMap::new(),
    }
}
