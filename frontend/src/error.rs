use thiserror::Error;

use crate::planner::RequestToken;

/// Local precondition failures; raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("select a starting point first")]
    MissingOrigin,
    #[error("select at least one destination")]
    MissingDestinations,
    #[error("at most {max} destinations can be visited, got {0}", max = crate::selection::MAX_DESTINATIONS)]
    TooManyDestinations(usize),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not reach the routing server: {0}")]
    Network(String),
    #[error("route error: {0}")]
    Route(String),
    #[error("response for request {token} superseded by request {current}")]
    Stale {
        token: RequestToken,
        current: RequestToken,
    },
}

impl RequestError {
    /// Stale responses are dropped without telling the user.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Stale { .. })
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
