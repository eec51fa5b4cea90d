// src/controller.rs

use crate::domain::{apply, FilterCriteria, FilterField, Listing, RawListing};
use crate::map::{MapError, MapSurface, MarkerSynchronizer, REFERENCE_POINT};
use crate::source::FetchError;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    List,
    Map,
}

/// The map pane never leaves `Loading` if the map failed to initialize.
pub enum MapPane<M: MapSurface> {
    Loading,
    Ready(MarkerSynchronizer<M>),
}

/// Proof that a fetch was started by this controller's current mount.
/// Results carrying an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// Owns all view state: the full listing set, the filter criteria, the
/// derived filtered sequence and the map pane.
pub struct ViewController<M: MapSurface> {
    lifecycle: Lifecycle,
    generation: u64,
    mounted: bool,
    listings: Vec<Listing>,
    criteria: FilterCriteria,
    filtered: Vec<Listing>,
    tab: Tab,
    map: MapPane<M>,
    loaded_at: Option<DateTime<Utc>>,
}

impl<M: MapSurface> Default for ViewController<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MapSurface> ViewController<M> {
    pub fn new() -> Self {
        Self {
            lifecycle: Lifecycle::Loading,
            generation: 0,
            mounted: false,
            listings: Vec::new(),
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            tab: Tab::default(),
            map: MapPane::Loading,
            loaded_at: None,
        }
    }

    /// Starts a (re)mount: back to `Loading`, and any fetch still in flight
    /// from an earlier mount becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.mounted = true;
        self.lifecycle = Lifecycle::Loading;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Applies a fetch result. Returns false when the ticket is stale or the
    /// controller was torn down, in which case nothing changes.
    ///
    /// A failed fetch is logged and leaves an empty listing set; the lifecycle
    /// still ends in `Ready`.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<RawListing>, FetchError>,
    ) -> bool {
        if !self.mounted || ticket.generation != self.generation {
            debug!(ticket = ticket.generation, current = self.generation, "discarding stale fetch");
            return false;
        }

        self.listings = match result {
            Ok(raw) => raw.into_iter().map(Listing::normalize).collect(),
            Err(e) => {
                warn!(error = %e, "Error fetching apartments");
                Vec::new()
            }
        };
        self.lifecycle = Lifecycle::Ready;
        self.loaded_at = Some(Utc::now());
        info!(listings = self.listings.len(), "listings loaded");

        self.refresh();
        true
    }

    /// Unmount. Pending fetches are discarded and the map is released.
    pub fn teardown(&mut self) {
        self.mounted = false;
        self.generation += 1;
        self.map = MapPane::Loading;
    }

    /// Hands the controller a map surface. On failure the pane stays in
    /// `Loading` and the list view is unaffected.
    pub fn attach_map(&mut self, surface: M) -> Result<(), MapError> {
        match MarkerSynchronizer::initialize(surface, REFERENCE_POINT) {
            Ok(mut sync) => {
                if let Err(e) = sync.rebuild(&self.filtered) {
                    warn!(error = %e, "Error updating markers");
                }
                self.map = MapPane::Ready(sync);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Error initializing map");
                self.map = MapPane::Loading;
                Err(e)
            }
        }
    }

    /// Recomputes the filtered sequence from scratch, then rebuilds markers.
    fn refresh(&mut self) {
        self.filtered = apply(&self.listings, &self.criteria);
        if let MapPane::Ready(sync) = &mut self.map {
            if let Err(e) = sync.rebuild(&self.filtered) {
                warn!(error = %e, "Error updating markers");
            }
        }
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh();
    }

    pub fn update_filter(&mut self, field: FilterField, value: &str) {
        self.criteria.set_field(field, value);
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_loading(&self) -> bool {
        self.lifecycle == Lifecycle::Loading
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn filtered(&self) -> &[Listing] {
        &self.filtered
    }

    pub fn map(&self) -> Option<&MarkerSynchronizer<M>> {
        match &self.map {
            MapPane::Ready(sync) => Some(sync),
            MapPane::Loading => None,
        }
    }

    pub fn map_mut(&mut self) -> Option<&mut MarkerSynchronizer<M>> {
        match &mut self.map {
            MapPane::Ready(sync) => Some(sync),
            MapPane::Loading => None,
        }
    }
}
