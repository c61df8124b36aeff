pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod map_layer;
pub mod markers;
pub mod planner;
pub mod render;
pub mod road_block;
pub mod route;
pub mod selection;
pub mod session;

#[cfg(target_arch = "wasm32")]
mod web;

pub use catalog::{CategoryFilter, PoiCatalog};
pub use client::{HttpBackend, RouteBackend, decode_route_reply};
pub use config::ClientConfig;
pub use error::{RequestError, ValidationError};
pub use map_layer::{MapSurface, Polyline, RouteBounds};
pub use markers::{MarkerKind, MarkerView};
pub use planner::{Command, Event, Planner, RequestToken};
pub use road_block::{OverlayState, RoadBlockOverlay};
pub use route::{ComparisonResult, RouteCandidate, RouteOutcome, RouteSet};
pub use selection::SelectionState;
pub use session::Session;
