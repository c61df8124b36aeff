use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

pub type PoiId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// GeoJSON positions are `[lon, lat, ...]`.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Some(Self {
                lat: *lat,
                lon: *lon,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: PoiId,
    pub name: String,
    pub category: String,
    pub lat: f64,
    pub lon: f64,
}

impl Poi {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    #[default]
    Alternatives,
    Compare,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start_id: PoiId,
    pub dest_ids: Vec<PoiId>,
    #[serde(default)]
    pub mode: RouteMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRoute {
    pub rank: u32,
    pub total_km: f64,
    pub sequence_ids: Vec<PoiId>,
    pub geojson: FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub time_ms: f64,
    pub nodes_visited: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedRoute {
    pub total_km: f64,
    #[serde(default)]
    pub sequence_ids: Vec<PoiId>,
    pub geojson: FeatureCollection,
    pub stats: SearchStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativesReply {
    pub routes: Vec<WireRoute>,
}

/// `astar` is the heuristic-guided search, `dijkstra` the exhaustive baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReply {
    pub astar: ComparedRoute,
    pub dijkstra: ComparedRoute,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockRoadRequest {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinate> for BlockRoadRequest {
    fn from(coord: Coordinate) -> Self {
        Self {
            lat: coord.lat,
            lon: coord.lon,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub error: String,
}
