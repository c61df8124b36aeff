use std::collections::{BTreeSet, HashMap};

use shared::{Poi, PoiId};

/// Shown in the timeline when a visited id is missing from the catalog.
pub const UNKNOWN_POI_NAME: &str = "Name not found";

/// Every selectable point plus a name index. Only ever replaced wholesale.
#[derive(Debug, Clone, Default)]
pub struct PoiCatalog {
    pois: Vec<Poi>,
    index: HashMap<PoiId, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` is the value the category dropdown uses for no filter.
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    /// Inverse of [`CategoryFilter::from_value`].
    pub fn value(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(category) => category,
        }
    }

    pub fn matches(&self, poi: &Poi) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => poi.category == *category,
        }
    }
}

impl PoiCatalog {
    pub fn new(pois: Vec<Poi>) -> Self {
        let index = pois
            .iter()
            .enumerate()
            .map(|(pos, poi)| (poi.id, pos))
            .collect();
        Self { pois, index }
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    pub fn get(&self, id: PoiId) -> Option<&Poi> {
        self.index.get(&id).map(|&pos| &self.pois[pos])
    }

    pub fn name_of(&self, id: PoiId) -> Option<&str> {
        self.get(id).map(|poi| poi.name.as_str())
    }

    /// Like [`name_of`](Self::name_of) but never fails.
    pub fn display_name(&self, id: PoiId) -> &str {
        self.name_of(id).unwrap_or(UNKNOWN_POI_NAME)
    }

    /// Distinct categories, alphabetically.
    pub fn categories(&self) -> Vec<&str> {
        self.pois
            .iter()
            .map(|poi| poi.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Catalog order is kept.
    pub fn visible<'a>(&'a self, filter: &'a CategoryFilter) -> impl Iterator<Item = &'a Poi> {
        self.pois.iter().filter(move |poi| filter.matches(poi))
    }
}

#[cfg(test)]
pub(crate) fn poi(id: PoiId, name: &str, category: &str) -> Poi {
    Poi {
        id,
        name: name.to_string(),
        category: category.to_string(),
        lat: -1.248 + id as f64 * 0.001,
        lon: 116.86 + id as f64 * 0.001,
    }
}
