use shared::{PoiId, RouteMode, RouteRequest};

use crate::error::ValidationError;

pub const MAX_DESTINATIONS: usize = 6;

/// Chosen origin and ordered destinations.
///
/// The origin never appears among the destinations, destinations hold no
/// duplicates and never exceed [`MAX_DESTINATIONS`]. Every mutator returns
/// whether the state actually changed so callers only re-render and
/// invalidate routes on real edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    origin: Option<PoiId>,
    destinations: Vec<PoiId>,
}

impl SelectionState {
    pub fn origin(&self) -> Option<PoiId> {
        self.origin
    }

    pub fn destinations(&self) -> &[PoiId] {
        &self.destinations
    }

    pub fn is_origin(&self, id: PoiId) -> bool {
        self.origin == Some(id)
    }

    pub fn is_destination(&self, id: PoiId) -> bool {
        self.destinations.contains(&id)
    }

    pub fn is_full(&self) -> bool {
        self.destinations.len() >= MAX_DESTINATIONS
    }

    /// No-op when `id` is already a destination.
    pub fn set_origin(&mut self, id: PoiId) -> bool {
        if self.is_destination(id) || self.is_origin(id) {
            return false;
        }
        self.origin = Some(id);
        true
    }

    pub fn add_destination(&mut self, id: PoiId) -> bool {
        if self.is_full() || self.is_origin(id) || self.is_destination(id) {
            return false;
        }
        self.destinations.push(id);
        true
    }

    pub fn remove_destination(&mut self, id: PoiId) -> bool {
        let before = self.destinations.len();
        self.destinations.retain(|&dest| dest != id);
        self.destinations.len() != before
    }

    /// Map marker click: empty origin is filled first, a destination is
    /// removed, the origin itself is left alone, anything else is appended.
    pub fn toggle_from_marker_click(&mut self, id: PoiId) -> bool {
        match self.origin {
            None => self.set_origin(id),
            Some(_) if self.is_destination(id) => self.remove_destination(id),
            Some(origin) if origin == id => false,
            Some(_) => self.add_destination(id),
        }
    }

    pub fn clear(&mut self) -> bool {
        if self.origin.is_none() && self.destinations.is_empty() {
            return false;
        }
        self.origin = None;
        self.destinations.clear();
        true
    }

    pub fn to_request(&self, mode: RouteMode) -> Result<RouteRequest, ValidationError> {
        let start_id = self.origin.ok_or(ValidationError::MissingOrigin)?;
        if self.destinations.is_empty() {
            return Err(ValidationError::MissingDestinations);
        }
        if self.destinations.len() > MAX_DESTINATIONS {
            return Err(ValidationError::TooManyDestinations(self.destinations.len()));
        }
        Ok(RouteRequest {
            start_id,
            dest_ids: self.destinations.clone(),
            mode,
        })
    }
}
