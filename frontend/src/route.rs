use geojson::FeatureCollection;
use serde_json::Value as JsonValue;
use shared::{ComparedRoute, ComparisonReply, Coordinate, PoiId, WireRoute};

pub const PRIMARY_LABEL: &str = "A*";
pub const BASELINE_LABEL: &str = "Dijkstra";

/// A colourable sub-path of a route, in visiting order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    pub index: usize,
    pub lines: Vec<Vec<Coordinate>>,
}

impl RouteSegment {
    pub fn popup_label(&self) -> String {
        format!("Segment #{}", self.index + 1)
    }

    pub fn coordinates(&self) -> impl Iterator<Item = &Coordinate> {
        self.lines.iter().flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteStats {
    pub algorithm: String,
    pub elapsed_ms: f64,
    pub nodes_visited: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    pub rank: u32,
    pub total_km: f64,
    /// Origin first, then destinations in visiting order.
    pub sequence_ids: Vec<PoiId>,
    pub segments: Vec<RouteSegment>,
    pub stats: Option<RouteStats>,
}

impl RouteCandidate {
    pub fn from_wire(route: WireRoute) -> Self {
        Self {
            rank: route.rank,
            total_km: route.total_km,
            sequence_ids: route.sequence_ids,
            segments: segments_from_geojson(&route.geojson),
            stats: None,
        }
    }

    fn from_compared(route: ComparedRoute, algorithm: &str) -> Self {
        Self {
            rank: 1,
            total_km: route.total_km,
            sequence_ids: route.sequence_ids,
            segments: segments_from_geojson(&route.geojson),
            stats: Some(RouteStats {
                algorithm: algorithm.to_string(),
                elapsed_ms: route.stats.time_ms,
                nodes_visited: route.stats.nodes_visited,
            }),
        }
    }

    pub fn destination_count(&self) -> usize {
        self.sequence_ids.len().saturating_sub(1)
    }
}

/// Ranked alternatives for one request plus the one being shown.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSet {
    candidates: Vec<RouteCandidate>,
    active: usize,
}

impl RouteSet {
    /// Candidates stay in backend order. `None` when there is nothing to show.
    pub fn new(candidates: Vec<RouteCandidate>) -> Option<Self> {
        let active = candidates
            .iter()
            .enumerate()
            .min_by_key(|(_, candidate)| candidate.rank)
            .map(|(pos, _)| pos)?;
        Some(Self { candidates, active })
    }

    pub fn candidates(&self) -> &[RouteCandidate] {
        &self.candidates
    }

    pub fn active_rank(&self) -> u32 {
        self.candidates[self.active].rank
    }

    pub fn active_candidate(&self) -> &RouteCandidate {
        &self.candidates[self.active]
    }

    /// Returns `false` and leaves the set alone when `rank` is unknown.
    pub fn select_rank(&mut self, rank: u32) -> bool {
        match self.candidates.iter().position(|c| c.rank == rank) {
            Some(pos) => {
                self.active = pos;
                true
            }
            None => false,
        }
    }
}

/// Heuristic-guided search next to the exhaustive baseline for the same tour.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub primary: RouteCandidate,
    pub baseline: RouteCandidate,
}

impl ComparisonResult {
    pub fn from_reply(reply: ComparisonReply) -> Self {
        Self {
            primary: RouteCandidate::from_compared(reply.astar, PRIMARY_LABEL),
            baseline: RouteCandidate::from_compared(reply.dijkstra, BASELINE_LABEL),
        }
    }

    pub fn primary_stats(&self) -> RouteStats {
        self.primary.stats.clone().unwrap_or_default()
    }

    pub fn baseline_stats(&self) -> RouteStats {
        self.baseline.stats.clone().unwrap_or_default()
    }
}

/// The two shapes a route request can resolve to.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Alternatives(RouteSet),
    Comparison(ComparisonResult),
}

impl RouteOutcome {
    /// The candidate whose geometry belongs on the map.
    pub fn drawn_candidate(&self) -> &RouteCandidate {
        match self {
            Self::Alternatives(set) => set.active_candidate(),
            Self::Comparison(result) => &result.primary,
        }
    }
}

/// Features without line geometry are skipped; a missing `segment_index`
/// falls back to the feature position.
pub fn segments_from_geojson(collection: &FeatureCollection) -> Vec<RouteSegment> {
    collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(pos, feature)| {
            let index = feature
                .property("segment_index")
                .and_then(segment_index)
                .unwrap_or(pos);
            let lines = match &feature.geometry.as_ref()?.value {
                geojson::Value::LineString(line) => vec![line_coordinates(line.as_slice())],
                geojson::Value::MultiLineString(lines) => {
                    lines.iter().map(|line| line_coordinates(line.as_slice())).collect()
                }
                _ => return None,
            };
            Some(RouteSegment { index, lines })
        })
        .collect()
}

fn segment_index(value: &JsonValue) -> Option<usize> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
        .map(|v| v as usize)
}

fn line_coordinates<P: AsRef<[f64]>>(line: &[P]) -> Vec<Coordinate> {
    line.iter()
        .filter_map(|position| Coordinate::from_position(position.as_ref()))
        .collect()
}

#[cfg(test)]
pub(crate) fn feature_collection(segments: &[&[[f64; 2]]]) -> FeatureCollection {
    let features = segments
        .iter()
        .enumerate()
        .map(|(idx, coords)| {
            serde_json::json!({
                "type": "Feature",
                "properties": {"segment_index": idx},
                "geometry": {"type": "LineString", "coordinates": coords},
            })
        })
        .collect::<Vec<_>>();
    serde_json::from_value(serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    }))
    .unwrap()
}

#[cfg(test)]
pub(crate) fn candidate(rank: u32, total_km: f64, sequence_ids: &[PoiId]) -> RouteCandidate {
    RouteCandidate {
        rank,
        total_km,
        sequence_ids: sequence_ids.to_vec(),
        segments: vec![RouteSegment {
            index: 0,
            lines: vec![vec![
                Coordinate { lat: -1.25, lon: 116.85 },
                Coordinate { lat: -1.24, lon: 116.87 },
            ]],
        }],
        stats: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_rank_is_active_on_receipt() {
        let set = RouteSet::new(vec![
            candidate(1, 8.4, &[5, 12, 7]),
            candidate(2, 9.1, &[5, 7, 12]),
        ])
        .unwrap();
        assert_eq!(set.active_rank(), 1);
        assert_eq!(set.active_candidate().total_km, 8.4);
    }

    #[test]
    fn select_rank_switches_or_ignores() {
        let mut set = RouteSet::new(vec![
            candidate(1, 8.4, &[5, 12]),
            candidate(2, 9.1, &[5, 12]),
            candidate(3, 9.1, &[5, 12]),
        ])
        .unwrap();
        assert!(set.select_rank(3));
        assert_eq!(set.active_candidate().rank, 3);

        let before = set.clone();
        assert!(!set.select_rank(4));
        assert_eq!(set, before);
    }

    #[test]
    fn backend_order_is_not_resorted() {
        let set = RouteSet::new(vec![candidate(2, 9.1, &[1, 2]), candidate(1, 8.4, &[1, 2])])
            .unwrap();
        let ranks: Vec<_> = set.candidates().iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![2, 1]);
        assert_eq!(set.active_rank(), 1);
    }

    #[test]
    fn empty_alternatives_make_no_set() {
        assert!(RouteSet::new(Vec::new()).is_none());
    }

    #[test]
    fn geojson_segments_keep_their_index() {
        let collection: FeatureCollection = serde_json::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"segment_index": 3},
                    "geometry": {"type": "LineString", "coordinates": [[116.8, -1.2], [116.9, -1.3]]}
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {"type": "MultiLineString", "coordinates": [[[116.9, -1.3], [117.0, -1.4]], [[117.0, -1.4], [117.1, -1.5]]]}
                },
                {
                    "type": "Feature",
                    "properties": {"segment_index": 9},
                    "geometry": {"type": "Point", "coordinates": [116.8, -1.2]}
                }
            ]
        }))
        .unwrap();

        let segments = segments_from_geojson(&collection);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].index, 3);
        assert_eq!(segments[0].lines[0][0], Coordinate { lat: -1.2, lon: 116.8 });
        assert_eq!(segments[1].index, 1);
        assert_eq!(segments[1].lines.len(), 2);
        assert_eq!(segments[0].popup_label(), "Segment #4");
    }
}
