// src/map/markers.rs

use super::placement::position_for;
use super::{
    Bounds, MapError, MapSurface, MarkerHandle, MarkerStyle, FIT_PADDING, FOCUS_ZOOM,
    INITIAL_ZOOM,
};
use crate::domain::{LatLng, Listing, ListingId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A listing marker currently attached to the map.
#[derive(Debug, Clone)]
pub struct PlacedMarker {
    pub handle: MarkerHandle,
    pub position: LatLng,
    pub listing: Listing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerEventKind {
    Click,
    Hover,
}

/// Pointer event reported by the map for one of its markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerEvent {
    pub handle: MarkerHandle,
    pub kind: MarkerEventKind,
}

/// Sole owner of the map surface and the marker registry.
///
/// The registry holds exactly one marker per listing in the last filtered
/// sequence passed to [`MarkerSynchronizer::rebuild`]. Selection and hover are
/// single slots keyed by listing id and are dropped as soon as their listing
/// leaves that sequence.
pub struct MarkerSynchronizer<M: MapSurface> {
    map: M,
    reference: LatLng,
    reference_handle: MarkerHandle,
    registry: HashMap<ListingId, PlacedMarker>,
    by_handle: HashMap<MarkerHandle, ListingId>,
    // filtered order, for iteration
    order: Vec<ListingId>,
    selected: Option<ListingId>,
    hovered: Option<ListingId>,
}

impl<M: MapSurface> MarkerSynchronizer<M> {
    /// Initializes the map around `reference` and pins the reference marker.
    pub fn initialize(mut map: M, reference: LatLng) -> Result<Self, MapError> {
        map.initialize(reference, INITIAL_ZOOM)?;
        let reference_handle = map.add_marker(reference, &MarkerStyle::reference())?;

        Ok(Self {
            map,
            reference,
            reference_handle,
            registry: HashMap::new(),
            by_handle: HashMap::new(),
            order: Vec::new(),
            selected: None,
            hovered: None,
        })
    }

    /// Tears down every listing marker and places one per listing in
    /// `filtered`, then fits the viewport around the reference point and the
    /// new markers. An empty sequence leaves the viewport where it was.
    pub fn rebuild(&mut self, filtered: &[Listing]) -> Result<(), MapError> {
        self.clear_markers();

        let mut result = Ok(());
        for listing in filtered {
            let position = position_for(listing, self.reference);
            let handle = match self
                .map
                .add_marker(position, &MarkerStyle::for_listing(listing))
            {
                Ok(handle) => handle,
                Err(e) => {
                    warn!(listing = %listing.id, error = %e, "failed to place marker");
                    result = Err(e);
                    break;
                }
            };

            self.by_handle.insert(handle, listing.id.clone());
            self.order.push(listing.id.clone());
            self.registry.insert(
                listing.id.clone(),
                PlacedMarker {
                    handle,
                    position,
                    listing: listing.clone(),
                },
            );
        }

        self.retain_selection();

        if !filtered.is_empty() && !self.registry.is_empty() {
            let mut bounds = Bounds::around(self.reference);
            for placed in self.registry.values() {
                bounds.extend(placed.position);
            }
            self.map.fit_bounds(bounds, FIT_PADDING);
        }

        debug!(markers = self.registry.len(), "markers rebuilt");
        result
    }

    fn clear_markers(&mut self) {
        for (_, placed) in self.registry.drain() {
            self.map.remove_marker(placed.handle);
        }
        self.by_handle.clear();
        self.order.clear();
    }

    fn retain_selection(&mut self) {
        if self
            .selected
            .as_ref()
            .is_some_and(|id| !self.registry.contains_key(id))
        {
            self.selected = None;
        }
        if self
            .hovered
            .as_ref()
            .is_some_and(|id| !self.registry.contains_key(id))
        {
            self.hovered = None;
        }
    }

    /// Routes a marker event from the map. Events for handles that are no
    /// longer registered (or for the reference marker) are ignored.
    pub fn handle_event(&mut self, event: MarkerEvent) -> bool {
        let Some(id) = self.by_handle.get(&event.handle).cloned() else {
            return false;
        };
        match event.kind {
            MarkerEventKind::Click => self.click(&id),
            MarkerEventKind::Hover => self.hover(&id),
        }
    }

    /// Marker click: select the listing and drop the hover preview.
    pub fn click(&mut self, id: &ListingId) -> bool {
        if !self.registry.contains_key(id) {
            return false;
        }
        self.selected = Some(id.clone());
        self.hovered = None;
        true
    }

    /// Pointer entered a marker. Selection is left alone.
    pub fn hover(&mut self, id: &ListingId) -> bool {
        if !self.registry.contains_key(id) {
            return false;
        }
        self.hovered = Some(id.clone());
        true
    }

    /// "View Details" in a marker popup.
    pub fn view_details(&mut self, id: &ListingId) -> bool {
        if !self.registry.contains_key(id) {
            return false;
        }
        self.selected = Some(id.clone());
        self.map.close_popup();
        true
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn close_hover(&mut self) {
        self.hovered = None;
    }

    /// Click on empty map area.
    pub fn map_clicked(&mut self) {
        self.hovered = None;
    }

    /// Zooms in on a listing's marker and opens its popup.
    pub fn center_on(&mut self, id: &ListingId) -> bool {
        let Some(placed) = self.registry.get(id) else {
            return false;
        };
        self.map.set_view(placed.position, FOCUS_ZOOM);
        self.map.open_popup(placed.handle);
        true
    }

    pub fn selected(&self) -> Option<&Listing> {
        self.selected
            .as_ref()
            .and_then(|id| self.registry.get(id))
            .map(|p| &p.listing)
    }

    pub fn hovered(&self) -> Option<&Listing> {
        self.hovered
            .as_ref()
            .and_then(|id| self.registry.get(id))
            .map(|p| &p.listing)
    }

    /// The hover preview is hidden while a listing is selected.
    pub fn hover_panel(&self) -> Option<&Listing> {
        if self.selected.is_some() {
            None
        } else {
            self.hovered()
        }
    }

    /// Up to `limit` other listings with the same bedroom count as the
    /// selected one, in filtered order. Unknown counts match each other.
    pub fn similar(&self, limit: usize) -> Vec<&Listing> {
        let Some(selected) = self.selected() else {
            return Vec::new();
        };
        self.markers()
            .map(|m| &m.listing)
            .filter(|l| l.id != selected.id && l.bedrooms == selected.bedrooms)
            .take(limit)
            .collect()
    }

    pub fn placed(&self, id: &ListingId) -> Option<&PlacedMarker> {
        self.registry.get(id)
    }

    /// Markers in filtered order.
    pub fn markers(&self) -> impl Iterator<Item = &PlacedMarker> {
        self.order.iter().filter_map(|id| self.registry.get(id))
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn reference_handle(&self) -> MarkerHandle {
        self.reference_handle
    }

    pub fn map(&self) -> &M {
        &self.map
    }
}
