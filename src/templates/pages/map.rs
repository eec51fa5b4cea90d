use crate::controller::Tab;
use crate::domain::{FilterCriteria, Listing};
use crate::templates::components::{detail_panel, filter_form, hover_panel, similar_panel};
use crate::templates::desktop_layout;
use maud::{html, Markup, PreEscaped};

pub struct MapPageVm<'a> {
    pub tab: Tab,
    pub loading: bool,
    pub criteria: &'a FilterCriteria,
    pub shown: usize,
    pub total: usize,
    /// Serialized map state; `None` while the map pane is still loading.
    pub map_state: Option<String>,
    pub selected: Option<&'a Listing>,
    pub hover: Option<&'a Listing>,
    pub similar: Vec<&'a Listing>,
}

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Keeps a JSON payload from closing the surrounding script element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

pub fn map_page(vm: &MapPageVm) -> Markup {
    desktop_layout(
        "Map of apartments near campus",
        vm.tab,
        &vm.criteria.to_query(),
        html! {
            div class="layout map-layout" {
                (filter_form(vm.criteria, "/map"))

                section class="map-pane" {
                    @if let Some(state) = &vm.map_state {
                        div id="map-container" {}
                        script id="map-state" type="application/json" { (PreEscaped(script_safe(state))) }
                        link rel="stylesheet" href=(LEAFLET_CSS);
                        script src=(LEAFLET_JS) {}
                        script src="/static/map.js" defer {}
                    } @else {
                        div class="map-loading" { "Loading map..." }
                    }
                    @if !vm.loading {
                        p class="result-count" {
                            "Showing " (vm.shown) " of " (vm.total) " apartments on the map"
                        }
                    }
                }

                section class="info-pane" {
                    @if let Some(listing) = vm.selected {
                        (detail_panel(listing))
                        (similar_panel(&vm.similar))
                    } @else if let Some(listing) = vm.hover {
                        (hover_panel(listing))
                    } @else {
                        p class="hint" { "Hover over a marker to preview an apartment." }
                    }
                }
            }
        },
    )
}
