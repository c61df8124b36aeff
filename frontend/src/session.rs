use std::collections::VecDeque;

use crate::client::RouteBackend;
use crate::map_layer::MapSurface;
use crate::planner::{Command, Event, Planner};

/// Runs the planner's update loop against a backend on the current thread.
pub struct Session<B: RouteBackend, M: MapSurface> {
    backend: B,
    planner: Planner<M>,
    alerts: Vec<String>,
    notices: Vec<String>,
}

impl<B: RouteBackend, M: MapSurface> Session<B, M> {
    pub fn new(backend: B, map: M) -> Self {
        Self {
            backend,
            planner: Planner::new(map),
            alerts: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn planner(&self) -> &Planner<M> {
        &self.planner
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Loads the catalog.
    pub async fn start(&mut self) {
        for command in self.planner.init() {
            if let Some(event) = self.execute(command).await {
                self.dispatch(event).await;
            }
        }
    }

    /// Applies `event` and keeps going until no command is left.
    pub async fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            for command in self.planner.update(event) {
                if let Some(reply) = self.execute(command).await {
                    queue.push_back(reply);
                }
            }
        }
    }

    /// Applies `event` without performing the resulting commands, so callers
    /// can decide when (and in which order) replies arrive.
    pub fn update(&mut self, event: Event) -> Vec<Command> {
        self.planner.update(event)
    }

    /// Performs one command and returns the event that answers it, if any.
    pub async fn execute(&mut self, command: Command) -> Option<Event> {
        match command {
            Command::LoadPois => Some(Event::CatalogLoaded(self.backend.fetch_pois().await)),
            Command::FetchRoute { token, request } => Some(Event::RouteFetched {
                token,
                result: self.backend.request_route(&request).await,
            }),
            Command::BlockRoad(at) => Some(Event::BlockAcked(self.backend.block_road(at).await)),
            Command::ResetBlocks => Some(Event::ResetAcked(self.backend.reset_blocks().await)),
            Command::Alert(message) => {
                self.alerts.push(message);
                None
            }
            Command::Notice(message) => {
                self.notices.push(message);
                None
            }
        }
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}
