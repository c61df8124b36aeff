//! Pure projections from route results to what the detail panel shows.

use shared::PoiId;

use crate::catalog::PoiCatalog;
use crate::route::{ComparisonResult, RouteCandidate, RouteSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKind {
    Origin,
    Destination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub kind: StopKind,
    pub label: String,
    pub poi_id: PoiId,
    pub name: String,
}

/// Travel sequence of `candidate`; unknown ids get a placeholder name.
pub fn timeline(candidate: &RouteCandidate, catalog: &PoiCatalog) -> Vec<TimelineEntry> {
    candidate
        .sequence_ids
        .iter()
        .enumerate()
        .map(|(position, &poi_id)| {
            let (kind, label) = if position == 0 {
                (StopKind::Origin, "Origin".to_string())
            } else {
                (StopKind::Destination, format!("Destination #{position}"))
            };
            TimelineEntry {
                kind,
                label,
                poi_id,
                name: catalog.display_name(poi_id).to_string(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteOption {
    pub rank: u32,
    pub title: String,
    pub destination_count: usize,
    pub total_km: f64,
    pub active: bool,
}

/// One selectable card per alternative, in backend order.
pub fn route_options(set: &RouteSet) -> Vec<RouteOption> {
    let active_rank = set.active_rank();
    set.candidates()
        .iter()
        .map(|candidate| RouteOption {
            rank: candidate.rank,
            title: format!("Route {}", candidate.rank),
            destination_count: candidate.destination_count(),
            total_km: candidate.total_km,
            active: candidate.rank == active_rank,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Primary,
    Baseline,
}

impl Side {
    /// Lower wins; ties go to the primary.
    fn lower(primary: f64, baseline: f64) -> Self {
        if primary <= baseline {
            Self::Primary
        } else {
            Self::Baseline
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRow {
    pub metric: &'static str,
    pub primary: String,
    pub baseline: String,
    pub winner: Side,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub primary_label: String,
    pub baseline_label: String,
    pub rows: Vec<MetricRow>,
    /// `baseline.nodes_visited / primary.nodes_visited`, `None` when the
    /// primary visited nothing.
    pub node_ratio: Option<f64>,
}

pub const NOT_AVAILABLE: &str = "n/a";

impl ComparisonTable {
    pub fn ratio_text(&self) -> String {
        match self.node_ratio {
            Some(ratio) => format!("{}x fewer", ratio.round()),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn analysis(&self) -> String {
        match self.node_ratio {
            Some(_) => format!(
                "{} checked {} intersections than {} to find the same tour.",
                self.primary_label,
                self.ratio_text(),
                self.baseline_label
            ),
            None => format!(
                "{} visited no nodes; ratio {}.",
                self.primary_label, NOT_AVAILABLE
            ),
        }
    }
}

pub fn comparison_table(result: &ComparisonResult) -> ComparisonTable {
    let primary = result.primary_stats();
    let baseline = result.baseline_stats();

    let rows = vec![
        MetricRow {
            metric: "Total distance",
            primary: format!("{} km", result.primary.total_km),
            baseline: format!("{} km", result.baseline.total_km),
            winner: Side::lower(result.primary.total_km, result.baseline.total_km),
        },
        MetricRow {
            metric: "Server time",
            primary: format!("{} ms", primary.elapsed_ms),
            baseline: format!("{} ms", baseline.elapsed_ms),
            winner: Side::lower(primary.elapsed_ms, baseline.elapsed_ms),
        },
        MetricRow {
            metric: "Nodes visited",
            primary: primary.nodes_visited.to_string(),
            baseline: baseline.nodes_visited.to_string(),
            winner: Side::lower(primary.nodes_visited as f64, baseline.nodes_visited as f64),
        },
    ];

    let node_ratio = (primary.nodes_visited > 0)
        .then(|| baseline.nodes_visited as f64 / primary.nodes_visited as f64);

    ComparisonTable {
        primary_label: primary.algorithm,
        baseline_label: baseline.algorithm,
        rows,
        node_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::poi;
    use crate::route::{RouteStats, candidate};

    fn catalog() -> PoiCatalog {
        PoiCatalog::new(vec![
            poi(5, "Bekapai Park", "Park"),
            poi(12, "Grand City Mall", "Toko/Mart"),
            poi(7, "Dahor Beach", "Attraction"),
        ])
    }

    fn measured(algorithm: &str, total_km: f64, elapsed_ms: f64, nodes: u64) -> RouteCandidate {
        let mut route = candidate(1, total_km, &[5, 12]);
        route.stats = Some(RouteStats {
            algorithm: algorithm.to_string(),
            elapsed_ms,
            nodes_visited: nodes,
        });
        route
    }

    #[test]
    fn timeline_labels_and_names() {
        let entries = timeline(&candidate(1, 8.4, &[5, 12, 7]), &catalog());
        let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Origin", "Destination #1", "Destination #2"]);
        assert_eq!(entries[0].kind, StopKind::Origin);
        assert_eq!(entries[2].name, "Dahor Beach");
    }

    #[test]
    fn timeline_survives_unknown_ids() {
        let entries = timeline(&candidate(1, 1.0, &[5, 404]), &catalog());
        assert_eq!(entries[1].name, crate::catalog::UNKNOWN_POI_NAME);
    }

    #[test]
    fn route_options_flag_active_rank() {
        let mut set =
            RouteSet::new(vec![candidate(1, 8.4, &[5, 12, 7]), candidate(2, 9.1, &[5, 7, 12])])
                .unwrap();
        set.select_rank(2);
        let options = route_options(&set);
        assert_eq!(options[0].title, "Route 1");
        assert_eq!(options[0].destination_count, 2);
        assert!(!options[0].active);
        assert!(options[1].active);
    }

    #[test]
    fn primary_wins_faster_and_leaner_runs() {
        let result = ComparisonResult {
            primary: measured("A*", 4.2, 3.0, 40),
            baseline: measured("Dijkstra", 4.2, 11.0, 310),
        };
        let table = comparison_table(&result);
        assert!(table.rows.iter().all(|row| row.winner == Side::Primary));
        assert_eq!(table.rows[1].primary, "3 ms");
        assert_eq!(table.ratio_text(), "8x fewer");
        assert!(table.analysis().contains("8x fewer"));
    }

    #[test]
    fn baseline_can_win_a_row() {
        let result = ComparisonResult {
            primary: measured("A*", 4.2, 12.0, 40),
            baseline: measured("Dijkstra", 4.2, 11.0, 310),
        };
        let table = comparison_table(&result);
        assert_eq!(table.rows[0].winner, Side::Primary);
        assert_eq!(table.rows[1].winner, Side::Baseline);
    }

    #[test]
    fn zero_primary_nodes_reports_sentinel() {
        let result = ComparisonResult {
            primary: measured("A*", 0.0, 0.0, 0),
            baseline: measured("Dijkstra", 0.0, 0.0, 12),
        };
        let table = comparison_table(&result);
        assert_eq!(table.node_ratio, None);
        assert_eq!(table.ratio_text(), NOT_AVAILABLE);
    }
}
