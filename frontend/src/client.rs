use reqwest::StatusCode;
use serde_json::Value as JsonValue;
use shared::{
    AlternativesReply, ApiFailure, BlockAck, BlockRoadRequest, ComparisonReply, Coordinate, Poi,
    RouteRequest,
};

use crate::config::ClientConfig;
use crate::error::{RequestError, ValidationError};
use crate::route::{ComparisonResult, RouteCandidate, RouteOutcome, RouteSet};
use crate::selection::MAX_DESTINATIONS;

/// The routing service as seen from the map UI.
///
/// Futures are not required to be `Send`: everything runs on the UI thread
/// (or a current-thread runtime in tests).
#[allow(async_fn_in_trait)]
pub trait RouteBackend {
    async fn fetch_pois(&self) -> Result<Vec<Poi>, RequestError>;
    async fn request_route(&self, request: &RouteRequest) -> Result<RouteOutcome, RequestError>;
    async fn block_road(&self, at: Coordinate) -> Result<BlockAck, RequestError>;
    async fn reset_blocks(&self) -> Result<BlockAck, RequestError>;
}

pub fn validate_request(request: &RouteRequest) -> Result<(), ValidationError> {
    match request.dest_ids.len() {
        0 => Err(ValidationError::MissingDestinations),
        n if n > MAX_DESTINATIONS => Err(ValidationError::TooManyDestinations(n)),
        _ => Ok(()),
    }
}

/// Turns a `/route` body into one of the two result shapes. An `error`
/// string wins over everything else; otherwise `mode` picks the shape.
pub fn decode_route_reply(body: &[u8]) -> Result<RouteOutcome, RequestError> {
    let value: JsonValue = serde_json::from_slice(body).map_err(malformed)?;
    if value.get("error").is_some() {
        let failure: ApiFailure = serde_json::from_value(value).map_err(malformed)?;
        return Err(RequestError::Route(failure.error));
    }

    match value.get("mode").and_then(JsonValue::as_str) {
        Some("compare") => {
            let reply: ComparisonReply = serde_json::from_value(value).map_err(malformed)?;
            Ok(RouteOutcome::Comparison(ComparisonResult::from_reply(reply)))
        }
        _ => {
            let reply: AlternativesReply = serde_json::from_value(value).map_err(malformed)?;
            let candidates = reply
                .routes
                .into_iter()
                .map(RouteCandidate::from_wire)
                .collect();
            RouteSet::new(candidates)
                .map(RouteOutcome::Alternatives)
                .ok_or_else(|| RequestError::Route("no route found".to_string()))
        }
    }
}

fn malformed(err: serde_json::Error) -> RequestError {
    RequestError::Network(format!("invalid response body: {err}"))
}

/// `{"status": "error", "message": ...}` is how the block endpoints fail.
fn check_ack(status: StatusCode, ack: BlockAck) -> Result<BlockAck, RequestError> {
    if ack.status.as_deref() == Some("error") {
        let message = ack
            .message
            .unwrap_or_else(|| "road block request failed".to_string());
        return Err(RequestError::Route(message));
    }
    if !status.is_success() {
        return Err(RequestError::Network(format!("server responded with {status}")));
    }
    Ok(ack)
}

/// [`RouteBackend`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn post_for_ack(
        &self,
        url: String,
        body: Option<BlockRoadRequest>,
    ) -> Result<BlockAck, RequestError> {
        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let ack = if bytes.is_empty() {
            BlockAck::default()
        } else {
            serde_json::from_slice(&bytes).map_err(malformed)?
        };
        check_ack(status, ack)
    }
}

impl RouteBackend for HttpBackend {
    async fn fetch_pois(&self) -> Result<Vec<Poi>, RequestError> {
        let pois = self
            .client
            .get(self.config.pois_url())
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Poi>>()
            .await?;
        tracing::debug!("loaded {} points of interest", pois.len());
        Ok(pois)
    }

    async fn request_route(&self, request: &RouteRequest) -> Result<RouteOutcome, RequestError> {
        validate_request(request)?;
        tracing::info!(
            start = request.start_id,
            destinations = ?request.dest_ids,
            mode = ?request.mode,
            "requesting route"
        );
        let response = self
            .client
            .post(self.config.route_url())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        match decode_route_reply(&body) {
            Err(RequestError::Network(_)) if !status.is_success() => Err(RequestError::Network(
                format!("server responded with {status}"),
            )),
            Ok(_) if !status.is_success() => Err(RequestError::Network(format!(
                "server responded with {status}"
            ))),
            outcome => outcome,
        }
    }

    async fn block_road(&self, at: Coordinate) -> Result<BlockAck, RequestError> {
        let ack = self
            .post_for_ack(self.config.block_road_url(), Some(at.into()))
            .await?;
        tracing::info!(lat = at.lat, lon = at.lon, ?ack, "road blocked");
        Ok(ack)
    }

    async fn reset_blocks(&self) -> Result<BlockAck, RequestError> {
        let ack = self
            .post_for_ack(self.config.reset_blocks_url(), None)
            .await?;
        tracing::info!(?ack, "road blocks reset");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::RouteMode;

    fn geojson() -> JsonValue {
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"segment_index": 0},
                "geometry": {"type": "LineString", "coordinates": [[116.86, -1.248], [116.87, -1.25]]}
            }]
        })
    }

    #[test]
    fn alternatives_become_a_route_set() {
        let body = json!({
            "mode": "single",
            "routes": [
                {"rank": 1, "total_km": 8.4, "sequence_ids": [5, 12, 7], "geojson": geojson()},
                {"rank": 2, "total_km": 9.1, "sequence_ids": [5, 7, 12], "geojson": geojson()}
            ]
        });
        let outcome = decode_route_reply(body.to_string().as_bytes()).unwrap();
        let RouteOutcome::Alternatives(set) = outcome else {
            panic!("expected alternatives");
        };
        assert_eq!(set.candidates().len(), 2);
        assert_eq!(set.active_rank(), 1);
        assert_eq!(set.active_candidate().segments.len(), 1);
    }

    #[test]
    fn missing_mode_means_alternatives() {
        let body = json!({
            "routes": [{"rank": 1, "total_km": 1.0, "sequence_ids": [1, 2], "geojson": geojson()}]
        });
        assert!(matches!(
            decode_route_reply(body.to_string().as_bytes()),
            Ok(RouteOutcome::Alternatives(_))
        ));
    }

    #[test]
    fn compare_mode_becomes_a_comparison() {
        let body = json!({
            "mode": "compare",
            "astar": {"total_km": 4.2, "geojson": geojson(), "stats": {"time_ms": 3, "nodes_visited": 40}},
            "dijkstra": {"total_km": 4.2, "geojson": geojson(), "stats": {"time_ms": 11, "nodes_visited": 310}}
        });
        let outcome = decode_route_reply(body.to_string().as_bytes()).unwrap();
        let RouteOutcome::Comparison(result) = outcome else {
            panic!("expected comparison");
        };
        assert_eq!(result.primary_stats().nodes_visited, 40);
        assert_eq!(result.baseline_stats().elapsed_ms, 11.0);
        assert_eq!(result.primary_stats().algorithm, "A*");
    }

    #[test]
    fn error_body_is_a_route_error() {
        let body = json!({"error": "Rute terputus/tidak ditemukan."});
        assert_eq!(
            decode_route_reply(body.to_string().as_bytes()),
            Err(RequestError::Route("Rute terputus/tidak ditemukan.".into()))
        );
    }

    #[test]
    fn error_wins_over_route_fields() {
        let body = json!({"mode": "compare", "error": "Gagal menemukan rute.", "routes": []});
        assert_eq!(
            decode_route_reply(body.to_string().as_bytes()),
            Err(RequestError::Route("Gagal menemukan rute.".into()))
        );
    }

    #[test]
    fn empty_alternatives_are_a_route_error() {
        let body = json!({"mode": "single", "routes": []});
        assert!(matches!(
            decode_route_reply(body.to_string().as_bytes()),
            Err(RequestError::Route(_))
        ));
    }

    #[test]
    fn garbage_is_a_network_error() {
        assert!(matches!(
            decode_route_reply(b"<html>502</html>"),
            Err(RequestError::Network(_))
        ));
    }

    #[test]
    fn request_needs_one_to_six_destinations() {
        let mut req = RouteRequest {
            start_id: 1,
            dest_ids: vec![],
            mode: RouteMode::Alternatives,
        };
        assert_eq!(
            validate_request(&req),
            Err(ValidationError::MissingDestinations)
        );
        req.dest_ids = (2..=8).collect();
        assert_eq!(
            validate_request(&req),
            Err(ValidationError::TooManyDestinations(7))
        );
        req.dest_ids.truncate(6);
        assert_eq!(validate_request(&req), Ok(()));
    }

    #[test]
    fn error_status_ack_is_rejected() {
        let ack = BlockAck {
            status: Some("error".into()),
            message: Some("no edge near point".into()),
        };
        assert_eq!(
            check_ack(StatusCode::INTERNAL_SERVER_ERROR, ack),
            Err(RequestError::Route("no edge near point".into()))
        );
        assert!(check_ack(StatusCode::OK, BlockAck::default()).is_ok());
    }
}
