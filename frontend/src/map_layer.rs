use serde::Serialize;
use shared::Coordinate;

use crate::markers::MarkerView;
use crate::route::RouteCandidate;

/// Segment colours, picked by `segment_index % len`.
pub const SEGMENT_PALETTE: [&str; 5] = ["#e74c3c", "#3498db", "#2ecc71", "#9b59b6", "#e67e22"];
pub const FIT_PADDING_PX: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl RouteBounds {
    pub fn from_coordinates<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        coords.into_iter().fold(None, |acc, c| {
            Some(match acc {
                None => Self {
                    min_lat: c.lat,
                    max_lat: c.lat,
                    min_lon: c.lon,
                    max_lon: c.lon,
                },
                Some(b) => Self {
                    min_lat: b.min_lat.min(c.lat),
                    max_lat: b.max_lat.max(c.lat),
                    min_lon: b.min_lon.min(c.lon),
                    max_lon: b.max_lon.max(c.lon),
                },
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub segment_index: usize,
    pub color: &'static str,
    pub popup: String,
    pub lines: Vec<Vec<Coordinate>>,
}

pub fn segment_color(segment_index: usize) -> &'static str {
    SEGMENT_PALETTE[segment_index % SEGMENT_PALETTE.len()]
}

pub fn polylines_for(candidate: &RouteCandidate) -> Vec<Polyline> {
    candidate
        .segments
        .iter()
        .map(|segment| Polyline {
            segment_index: segment.index,
            color: segment_color(segment.index),
            popup: segment.popup_label(),
            lines: segment.lines.clone(),
        })
        .collect()
}

/// Whatever actually paints the map: Leaflet in the browser, a recorder in
/// tests.
pub trait MapSurface {
    /// Replaces every POI marker.
    fn show_markers(&mut self, markers: &[MarkerView]);
    /// Adds one polyline to the current route layer.
    fn add_route_polyline(&mut self, polyline: &Polyline);
    fn remove_route_layer(&mut self);
    fn fit_bounds(&mut self, bounds: RouteBounds, padding_px: u32);
    fn add_block_marker(&mut self, at: Coordinate);
    fn clear_block_markers(&mut self);
}

/// Keeps at most one route drawn on a [`MapSurface`].
#[derive(Debug, Default)]
pub struct RouteLayer {
    drawn: bool,
}

impl RouteLayer {
    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    pub fn draw<M: MapSurface>(&mut self, surface: &mut M, candidate: &RouteCandidate) {
        self.clear(surface);
        for polyline in polylines_for(candidate) {
            surface.add_route_polyline(&polyline);
        }
        self.drawn = true;
        let bounds = RouteBounds::from_coordinates(
            candidate.segments.iter().flat_map(|segment| segment.coordinates()),
        );
        if let Some(bounds) = bounds {
            surface.fit_bounds(bounds, FIT_PADDING_PX);
        }
    }

    pub fn clear<M: MapSurface>(&mut self, surface: &mut M) {
        if self.drawn {
            surface.remove_route_layer();
            self.drawn = false;
        }
    }
}
