// src/map/mod.rs
//
// Everything here talks to the map library through `MapSurface`.

mod markers;
mod placement;
mod snapshot;

pub use markers::{MarkerEvent, MarkerEventKind, MarkerSynchronizer};
pub use snapshot::{MapSnapshot, SnapshotMap, Viewport};

use crate::domain::{LatLng, Listing};
use serde::Serialize;
use thiserror::Error;

/// Penn State University Park. Map anchor and origin for synthesized positions.
pub const REFERENCE_POINT: LatLng = LatLng::new(40.7982, -77.8599);
pub const REFERENCE_LABEL: &str = "PSU";
pub const INITIAL_ZOOM: u8 = 14;
pub const FOCUS_ZOOM: u8 = 16;
pub const FIT_PADDING: (u32, u32) = (50, 50);
pub const SIMILAR_LIMIT: usize = 3;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
    #[error("map library unavailable: {0}")]
    Unavailable(String),

    #[error("map operation failed: {0}")]
    Operation(String),
}

/// Opaque handle the map hands back for every marker it creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MarkerHandle(pub u64);

/// Popup text shown when a listing marker is clicked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub address: String,
    pub rent: String,
    pub listing_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerStyle {
    Reference { label: String },
    Listing {
        label: String,
        featured: bool,
        popup: Popup,
    },
}

impl MarkerStyle {
    pub fn reference() -> Self {
        MarkerStyle::Reference {
            label: REFERENCE_LABEL.to_string(),
        }
    }

    pub fn for_listing(listing: &Listing) -> Self {
        MarkerStyle::Listing {
            label: listing.bedrooms_label(),
            featured: listing.featured,
            popup: Popup {
                title: listing.name.clone(),
                address: listing.address.clone(),
                rent: listing.rent_label(),
                listing_id: listing.id.to_string(),
            },
        }
    }
}

/// Axis-aligned lat/lng box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn around(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    pub fn contains(&self, point: LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }
}

/// Operations consumed from the map library.
pub trait MapSurface {
    fn initialize(&mut self, center: LatLng, zoom: u8) -> Result<(), MapError>;

    fn add_marker(&mut self, position: LatLng, style: &MarkerStyle)
        -> Result<MarkerHandle, MapError>;

    fn remove_marker(&mut self, handle: MarkerHandle);

    fn fit_bounds(&mut self, bounds: Bounds, padding: (u32, u32));

    fn set_view(&mut self, center: LatLng, zoom: u8);

    fn open_popup(&mut self, handle: MarkerHandle);

    fn close_popup(&mut self);
}
