use serde::Serialize;
use shared::{Poi, PoiId};

use crate::selection::SelectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Origin,
    Destination,
    Neutral,
}

impl MarkerKind {
    pub fn of(id: PoiId, selection: &SelectionState) -> Self {
        if selection.is_origin(id) {
            Self::Origin
        } else if selection.is_destination(id) {
            Self::Destination
        } else {
            Self::Neutral
        }
    }

    /// Stacking offset; the origin is drawn above everything else.
    pub fn z_index(self) -> i32 {
        match self {
            Self::Origin => 1000,
            Self::Destination => 900,
            Self::Neutral => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub poi_id: PoiId,
    pub lat: f64,
    pub lon: f64,
    pub kind: MarkerKind,
    pub z_index: i32,
    /// Ready-to-bind HTML: escaped name over escaped category.
    pub tooltip: String,
}

/// One marker per visible POI, coloured by the selection.
pub fn assign_markers<'a>(
    visible: impl IntoIterator<Item = &'a Poi>,
    selection: &SelectionState,
) -> Vec<MarkerView> {
    visible
        .into_iter()
        .map(|poi| {
            let kind = MarkerKind::of(poi.id, selection);
            let at = poi.coordinate();
            MarkerView {
                poi_id: poi.id,
                lat: at.lat,
                lon: at.lon,
                kind,
                z_index: kind.z_index(),
                tooltip: format!(
                    "{}<br><small>{}</small>",
                    escape_html(&poi.name),
                    escape_html(&poi.category)
                ),
            }
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
