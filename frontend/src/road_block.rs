use shared::Coordinate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Inactive,
    Active,
}

/// "Block a road" interaction mode. The backend owns the real blocking
/// state; this only remembers where block markers were placed.
#[derive(Debug, Clone, Default)]
pub struct RoadBlockOverlay {
    state: OverlayState,
    blocked: Vec<Coordinate>,
}

impl RoadBlockOverlay {
    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == OverlayState::Active
    }

    pub fn blocked_points(&self) -> &[Coordinate] {
        &self.blocked
    }

    pub fn toggle(&mut self) -> OverlayState {
        self.state = match self.state {
            OverlayState::Inactive => OverlayState::Active,
            OverlayState::Active => OverlayState::Inactive,
        };
        self.state
    }

    /// Records a block point when active. Clicks while inactive are ignored.
    pub fn map_clicked(&mut self, at: Coordinate) -> Option<Coordinate> {
        if !self.is_active() {
            return None;
        }
        self.blocked.push(at);
        Some(at)
    }

    pub fn reset(&mut self) {
        self.blocked.clear();
        self.state = OverlayState::Inactive;
    }
}
