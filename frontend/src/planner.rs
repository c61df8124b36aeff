use std::fmt;

use shared::{BlockAck, Coordinate, Poi, PoiId, RouteMode, RouteRequest};

use crate::catalog::{CategoryFilter, PoiCatalog};
use crate::error::RequestError;
use crate::map_layer::{MapSurface, RouteLayer};
use crate::markers::{MarkerView, assign_markers};
use crate::render::{self, ComparisonTable, RouteOption, TimelineEntry};
use crate::road_block::RoadBlockOverlay;
use crate::route::RouteOutcome;
use crate::selection::SelectionState;

pub const BLOCKS_CLEARED_NOTICE: &str = "All road blocks cleared.";

/// Generation counter for route requests. Only the newest one may land.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    CatalogLoaded(Result<Vec<Poi>, RequestError>),
    SetOrigin(PoiId),
    AddDestination(PoiId),
    RemoveDestination(PoiId),
    MarkerClicked(PoiId),
    ClearSelection,
    FilterCategory(CategoryFilter),
    SetMode(RouteMode),
    Compute,
    RouteFetched {
        token: RequestToken,
        result: Result<RouteOutcome, RequestError>,
    },
    SelectRank(u32),
    ToggleBlockMode,
    MapClicked(Coordinate),
    BlockAcked(Result<BlockAck, RequestError>),
    ResetBlocks,
    ResetAcked(Result<BlockAck, RequestError>),
}

/// Side effects requested by [`Planner::update`]; the runtime performs them
/// and answers with the matching [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadPois,
    FetchRoute {
        token: RequestToken,
        request: RouteRequest,
    },
    BlockRoad(Coordinate),
    ResetBlocks,
    Alert(String),
    Notice(String),
}

/// Owns every piece of UI state and is its only writer.
pub struct Planner<M: MapSurface> {
    catalog: PoiCatalog,
    selection: SelectionState,
    filter: CategoryFilter,
    mode: RouteMode,
    displayed: Option<RouteOutcome>,
    last_request: Option<RouteRequest>,
    token: RequestToken,
    pending: bool,
    overlay: RoadBlockOverlay,
    route_layer: RouteLayer,
    map: M,
}

impl<M: MapSurface> Planner<M> {
    pub fn new(map: M) -> Self {
        Self {
            catalog: PoiCatalog::default(),
            selection: SelectionState::default(),
            filter: CategoryFilter::All,
            mode: RouteMode::default(),
            displayed: None,
            last_request: None,
            token: RequestToken::default(),
            pending: false,
            overlay: RoadBlockOverlay::default(),
            route_layer: RouteLayer::default(),
            map,
        }
    }

    pub fn init(&self) -> Vec<Command> {
        vec![Command::LoadPois]
    }

    pub fn catalog(&self) -> &PoiCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn mode(&self) -> RouteMode {
        self.mode
    }

    pub fn displayed(&self) -> Option<&RouteOutcome> {
        self.displayed.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn overlay(&self) -> &RoadBlockOverlay {
        &self.overlay
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn markers(&self) -> Vec<MarkerView> {
        assign_markers(self.catalog.visible(&self.filter), &self.selection)
    }

    pub fn visible_pois(&self) -> impl Iterator<Item = &Poi> {
        self.catalog.visible(&self.filter)
    }

    /// Visible POIs that may become the origin: anything but a destination.
    pub fn origin_choices(&self) -> impl Iterator<Item = &Poi> {
        self.visible_pois()
            .filter(|poi| !self.selection.is_destination(poi.id))
    }

    /// Visible POIs not selected in any role.
    pub fn destination_choices(&self) -> impl Iterator<Item = &Poi> {
        self.visible_pois().filter(|poi| {
            !self.selection.is_origin(poi.id) && !self.selection.is_destination(poi.id)
        })
    }

    pub fn timeline(&self) -> Option<Vec<TimelineEntry>> {
        match &self.displayed {
            Some(RouteOutcome::Alternatives(set)) => {
                Some(render::timeline(set.active_candidate(), &self.catalog))
            }
            _ => None,
        }
    }

    pub fn route_options(&self) -> Option<Vec<RouteOption>> {
        match &self.displayed {
            Some(RouteOutcome::Alternatives(set)) => Some(render::route_options(set)),
            _ => None,
        }
    }

    pub fn comparison(&self) -> Option<ComparisonTable> {
        match &self.displayed {
            Some(RouteOutcome::Comparison(result)) => Some(render::comparison_table(result)),
            _ => None,
        }
    }

    pub fn update(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::CatalogLoaded(Ok(pois)) => {
                tracing::debug!("catalog loaded with {} points", pois.len());
                self.catalog = PoiCatalog::new(pois);
                self.refresh_markers();
                Vec::new()
            }
            Event::CatalogLoaded(Err(err)) => alert(err),
            Event::SetOrigin(id) => {
                let changed = self.selection.set_origin(id);
                self.after_selection_edit(changed)
            }
            Event::AddDestination(id) => {
                let changed = self.selection.add_destination(id);
                self.after_selection_edit(changed)
            }
            Event::RemoveDestination(id) => {
                let changed = self.selection.remove_destination(id);
                self.after_selection_edit(changed)
            }
            Event::MarkerClicked(id) => {
                let changed = self.selection.toggle_from_marker_click(id);
                self.after_selection_edit(changed)
            }
            Event::ClearSelection => {
                let changed = self.selection.clear();
                self.after_selection_edit(changed)
            }
            Event::FilterCategory(filter) => {
                self.filter = filter;
                self.refresh_markers();
                Vec::new()
            }
            Event::SetMode(mode) => {
                self.mode = mode;
                Vec::new()
            }
            Event::Compute => match self.selection.to_request(self.mode) {
                Ok(request) => self.issue(request),
                Err(err) => alert(RequestError::from(err)),
            },
            Event::RouteFetched { token, result } => self.route_fetched(token, result),
            Event::SelectRank(rank) => {
                let switched = match &mut self.displayed {
                    Some(RouteOutcome::Alternatives(set)) => set.select_rank(rank),
                    _ => false,
                };
                if switched {
                    self.redraw_route();
                }
                Vec::new()
            }
            Event::ToggleBlockMode => {
                let state = self.overlay.toggle();
                tracing::debug!(?state, "road block mode toggled");
                Vec::new()
            }
            Event::MapClicked(at) => match self.overlay.map_clicked(at) {
                Some(at) => {
                    self.map.add_block_marker(at);
                    vec![Command::BlockRoad(at)]
                }
                None => Vec::new(),
            },
            Event::BlockAcked(Ok(_)) => self.reissue_displayed(),
            Event::BlockAcked(Err(err)) => alert(err),
            Event::ResetBlocks => vec![Command::ResetBlocks],
            // Markers stay until the backend confirms; it may still hold the blocks.
            Event::ResetAcked(Ok(_)) => {
                self.overlay.reset();
                self.map.clear_block_markers();
                let mut commands = vec![Command::Notice(BLOCKS_CLEARED_NOTICE.to_string())];
                commands.extend(self.reissue_displayed());
                commands
            }
            Event::ResetAcked(Err(err)) => alert(err),
        }
    }

    fn after_selection_edit(&mut self, changed: bool) -> Vec<Command> {
        if !changed {
            return Vec::new();
        }
        self.refresh_markers();
        self.invalidate_route();
        Vec::new()
    }

    /// The displayed route no longer matches the selection: drop it and make
    /// any in-flight answer stale.
    fn invalidate_route(&mut self) {
        self.token = self.token.next();
        self.pending = false;
        self.displayed = None;
        self.last_request = None;
        self.route_layer.clear(&mut self.map);
    }

    fn issue(&mut self, request: RouteRequest) -> Vec<Command> {
        self.token = self.token.next();
        self.pending = true;
        self.last_request = Some(request.clone());
        tracing::info!(token = %self.token, "route request issued");
        vec![Command::FetchRoute {
            token: self.token,
            request,
        }]
    }

    fn reissue_displayed(&mut self) -> Vec<Command> {
        if self.displayed.is_none() {
            return Vec::new();
        }
        match self.last_request.clone() {
            Some(request) => self.issue(request),
            None => Vec::new(),
        }
    }

    fn route_fetched(
        &mut self,
        token: RequestToken,
        result: Result<RouteOutcome, RequestError>,
    ) -> Vec<Command> {
        if token != self.token {
            let stale = RequestError::Stale {
                token,
                current: self.token,
            };
            tracing::debug!("{stale}");
            return Vec::new();
        }
        self.pending = false;
        match result {
            Ok(outcome) => {
                self.displayed = Some(outcome);
                self.redraw_route();
                Vec::new()
            }
            Err(err) => alert(err),
        }
    }

    fn redraw_route(&mut self) {
        match &self.displayed {
            Some(outcome) => self
                .route_layer
                .draw(&mut self.map, outcome.drawn_candidate()),
            None => self.route_layer.clear(&mut self.map),
        }
    }

    fn refresh_markers(&mut self) {
        let markers = assign_markers(self.catalog.visible(&self.filter), &self.selection);
        self.map.show_markers(&markers);
    }
}

fn alert(err: RequestError) -> Vec<Command> {
    if !err.is_user_visible() {
        tracing::debug!("{err}");
        return Vec::new();
    }
    tracing::warn!("{err}");
    vec![Command::Alert(err.to_string())]
}
