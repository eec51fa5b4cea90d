// src/map/snapshot.rs

use super::{Bounds, MapError, MapSurface, MarkerHandle, MarkerStyle};
use crate::domain::LatLng;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Viewport {
    Unset,
    Center { center: LatLng, zoom: u8 },
    Fit { bounds: Bounds, padding: (u32, u32) },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotMarker {
    pub handle: MarkerHandle,
    pub position: LatLng,
    pub style: MarkerStyle,
}

/// Serializable picture of the map, handed to the browser script that draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSnapshot {
    pub viewport: Viewport,
    pub markers: Vec<SnapshotMarker>,
    pub open_popup: Option<MarkerHandle>,
}

/// In-memory map surface. Keeps the state a real map would hold so it can be
/// rendered client-side.
#[derive(Debug)]
pub struct SnapshotMap {
    available: bool,
    initialized: bool,
    next_handle: u64,
    markers: BTreeMap<MarkerHandle, SnapshotMarker>,
    viewport: Viewport,
    open_popup: Option<MarkerHandle>,
}

impl Default for SnapshotMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotMap {
    pub fn new() -> Self {
        Self {
            available: true,
            initialized: false,
            next_handle: 1,
            markers: BTreeMap::new(),
            viewport: Viewport::Unset,
            open_popup: None,
        }
    }

    /// A surface whose initialization always fails, as when the map library
    /// cannot be loaded.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&SnapshotMarker> {
        self.markers.get(&handle)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn open_popup_handle(&self) -> Option<MarkerHandle> {
        self.open_popup
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            viewport: self.viewport.clone(),
            markers: self.markers.values().cloned().collect(),
            open_popup: self.open_popup,
        }
    }
}

impl MapSurface for SnapshotMap {
    fn initialize(&mut self, center: LatLng, zoom: u8) -> Result<(), MapError> {
        if !self.available {
            return Err(MapError::Unavailable("map surface disabled".into()));
        }
        self.initialized = true;
        self.viewport = Viewport::Center { center, zoom };
        Ok(())
    }

    fn add_marker(
        &mut self,
        position: LatLng,
        style: &MarkerStyle,
    ) -> Result<MarkerHandle, MapError> {
        if !self.initialized {
            return Err(MapError::Operation("map not initialized".into()));
        }
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;
        self.markers.insert(
            handle,
            SnapshotMarker {
                handle,
                position,
                style: style.clone(),
            },
        );
        Ok(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
        if self.open_popup == Some(handle) {
            self.open_popup = None;
        }
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: (u32, u32)) {
        self.viewport = Viewport::Fit { bounds, padding };
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.viewport = Viewport::Center { center, zoom };
    }

    fn open_popup(&mut self, handle: MarkerHandle) {
        if self.markers.contains_key(&handle) {
            self.open_popup = Some(handle);
        }
    }

    fn close_popup(&mut self) {
        self.open_popup = None;
    }
}
