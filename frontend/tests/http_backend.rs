use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use shared::{BlockRoadRequest, Coordinate, RouteMode, RouteRequest};
use tourmap_frontend::{
    ClientConfig, HttpBackend, RequestError, RouteBackend, RouteOutcome, ValidationError,
};

fn geojson() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"segment_index": 0},
                "geometry": {"type": "LineString", "coordinates": [[116.860, -1.248], [116.865, -1.250]]}
            },
            {
                "type": "Feature",
                "properties": {"segment_index": 1},
                "geometry": {"type": "LineString", "coordinates": [[116.865, -1.250], [116.870, -1.255]]}
            }
        ]
    })
}

async fn pois() -> Json<Value> {
    Json(json!([
        {"id": 5, "name": "Bekapai Park", "category": "Park", "lat": -1.248, "lon": 116.86},
        {"id": 12, "name": "Grand City Mall", "category": "Toko/Mart", "lat": -1.25, "lon": 116.865}
    ]))
}

async fn route(Json(req): Json<RouteRequest>) -> Json<Value> {
    if req.start_id == 404 {
        return Json(json!({"error": "Gagal menemukan rute."}));
    }
    let mut sequence = vec![req.start_id];
    sequence.extend(&req.dest_ids);
    match req.mode {
        RouteMode::Compare => Json(json!({
            "mode": "compare",
            "astar": {"total_km": 8.4, "sequence_ids": sequence, "geojson": geojson(), "stats": {"time_ms": 3, "nodes_visited": 40}},
            "dijkstra": {"total_km": 8.4, "sequence_ids": sequence, "geojson": geojson(), "stats": {"time_ms": 11, "nodes_visited": 310}}
        })),
        RouteMode::Alternatives => Json(json!({
            "mode": "single",
            "routes": [
                {"rank": 1, "total_km": 8.4, "sequence_ids": sequence, "geojson": geojson()},
                {"rank": 2, "total_km": 9.1, "sequence_ids": sequence, "geojson": geojson()}
            ]
        })),
    }
}

async fn block_road(Json(req): Json<BlockRoadRequest>) -> Response {
    if req.lat > 90.0 {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error", "message": "latitude out of range"})),
        )
            .into_response();
    }
    Json(json!({"status": "success", "message": format!("blocked near {:.4},{:.4}", req.lat, req.lon)}))
        .into_response()
}

async fn reset_blocks() -> Json<Value> {
    Json(json!({"status": "success", "message": "all blocks removed"}))
}

async fn broken_route() -> Response {
    (StatusCode::BAD_GATEWAY, "upstream down").into_response()
}

async fn spawn(app: Router) -> HttpBackend {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    HttpBackend::new(ClientConfig::new(format!("http://{addr}/api/")))
}

async fn mock_backend() -> HttpBackend {
    spawn(
        Router::new()
            .route("/api/pois", get(pois))
            .route("/api/route", post(route))
            .route("/api/block_road", post(block_road))
            .route("/api/reset_blocks", post(reset_blocks)),
    )
    .await
}

fn request(mode: RouteMode) -> RouteRequest {
    RouteRequest {
        start_id: 5,
        dest_ids: vec![12],
        mode,
    }
}

#[tokio::test]
async fn loads_catalog() {
    let backend = mock_backend().await;
    let pois = backend.fetch_pois().await.unwrap();
    assert_eq!(pois.len(), 2);
    assert_eq!(pois[1].name, "Grand City Mall");
}

#[tokio::test]
async fn alternatives_over_http() {
    let backend = mock_backend().await;
    let outcome = backend
        .request_route(&request(RouteMode::Alternatives))
        .await
        .unwrap();
    let RouteOutcome::Alternatives(set) = outcome else {
        panic!("expected alternatives");
    };
    assert_eq!(set.candidates().len(), 2);
    assert_eq!(set.active_rank(), 1);
    assert_eq!(set.active_candidate().sequence_ids, vec![5, 12]);
    assert_eq!(set.active_candidate().segments.len(), 2);
}

#[tokio::test]
async fn comparison_over_http() {
    let backend = mock_backend().await;
    let outcome = backend
        .request_route(&request(RouteMode::Compare))
        .await
        .unwrap();
    let RouteOutcome::Comparison(result) = outcome else {
        panic!("expected comparison");
    };
    assert_eq!(result.primary_stats().nodes_visited, 40);
    assert_eq!(result.baseline_stats().nodes_visited, 310);
}

#[tokio::test]
async fn backend_error_message_is_kept() {
    let backend = mock_backend().await;
    let mut req = request(RouteMode::Alternatives);
    req.start_id = 404;
    assert_eq!(
        backend.request_route(&req).await,
        Err(RequestError::Route("Gagal menemukan rute.".into()))
    );
}

#[tokio::test]
async fn invalid_request_never_leaves_the_client() {
    // nothing listens here; a network call would fail differently
    let backend = HttpBackend::new(ClientConfig::new("http://127.0.0.1:9/api"));
    let mut req = request(RouteMode::Alternatives);
    req.dest_ids.clear();
    assert_eq!(
        backend.request_route(&req).await,
        Err(RequestError::Validation(ValidationError::MissingDestinations))
    );
}

#[tokio::test]
async fn block_and_reset_acknowledged() {
    let backend = mock_backend().await;
    let ack = backend
        .block_road(Coordinate {
            lat: -1.25,
            lon: 116.86,
        })
        .await
        .unwrap();
    assert_eq!(ack.status.as_deref(), Some("success"));

    let ack = backend.reset_blocks().await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("all blocks removed"));
}

#[tokio::test]
async fn block_failure_surfaces_backend_message() {
    let backend = mock_backend().await;
    let err = backend
        .block_road(Coordinate {
            lat: 95.0,
            lon: 0.0,
        })
        .await
        .unwrap_err();
    assert_eq!(err, RequestError::Route("latitude out of range".into()));
}

#[tokio::test]
async fn non_json_failure_is_a_network_error() {
    let backend = spawn(Router::new().route("/api/route", post(broken_route))).await;
    let err = backend
        .request_route(&request(RouteMode::Alternatives))
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(ClientConfig::new(format!("http://{addr}/api")));
    let err = backend.fetch_pois().await.unwrap_err();
    assert!(matches!(err, RequestError::Network(_)), "got {err:?}");
}
