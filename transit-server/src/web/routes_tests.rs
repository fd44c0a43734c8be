//! Handler tests against a small in-memory dataset.

use axum::body::to_bytes;

use super::*;
use crate::cache::CacheConfig;
use crate::provider::JsonDataset;

/// A-B-C-D line plus a branch station E, and the two morning trips.
const DATASET: &str = r#"{
    "version": "test",
    "stops": [
        {"stop_id": "A", "stop_name": "Alpha", "lat": 48.0, "lon": 2.0},
        {"stop_id": "B", "stop_name": "Bravo", "lat": 48.1, "lon": 2.1},
        {"stop_id": "B2", "stop_name": "Bravo", "lat": 48.1, "lon": 2.1},
        {"stop_id": "C", "stop_name": "Charlie", "lat": 48.2, "lon": 2.2},
        {"stop_id": "D", "stop_name": "Delta", "lat": 48.3, "lon": 2.3}
    ],
    "lines": {
        "ligne1": [
            {"stop_id": "B", "stop_sequence": 2, "stop_name": "Bravo", "lat": 48.1, "lon": 2.1},
            {"stop_id": "A", "stop_sequence": 1, "stop_name": "Alpha", "lat": 48.0, "lon": 2.0}
        ],
        "ligne2": [
            {"stop_id": "C", "stop_sequence": 1, "stop_name": "Charlie", "lat": 48.2, "lon": 2.2},
            {"stop_id": "X", "stop_sequence": 2, "stop_name": "Xray", "lat": 48.4, "lon": 2.4}
        ]
    },
    "merged_stations": [
        {"id": 0, "stop_ids": ["A"]},
        {"id": 1, "stop_ids": ["B", "B2"]},
        {"id": 2, "stop_ids": ["C"]},
        {"id": 3, "stop_ids": ["D"]}
    ],
    "links": [
        {"from": 0, "to": 1, "weight": 4},
        {"from": 1, "to": 2, "weight": 1},
        {"from": 0, "to": 2, "weight": 10},
        {"from": 2, "to": 3, "weight": 2}
    ],
    "trips": [
        {
            "trip_id": "T1",
            "service_id": "WK",
            "stop_times": [
                {"stop_id": "A", "arrival_time": "08:00:00", "departure_time": "08:00:00"},
                {"stop_id": "B", "arrival_time": "08:10:00", "departure_time": "08:10:00"}
            ]
        },
        {
            "trip_id": "T2",
            "service_id": "WK",
            "route_id": "R2",
            "route_name": "Ligne 2",
            "headsign": "Charlie",
            "stop_times": [
                {"stop_id": "B", "arrival_time": "08:20:00", "departure_time": "08:20:00"},
                {"stop_id": "C", "arrival_time": "08:25:00", "departure_time": "08:25:00"}
            ]
        }
    ],
    "calendar": [
        {"service_id": "WK", "start_date": "2024-05-01", "end_date": "2024-05-31"}
    ],
    "transfers": [
        {"from_stop_id": "B", "to_stop_id": "B2", "min_transfer_time": 0}
    ]
}"#;

fn state() -> AppState {
    AppState::new(
        JsonDataset::from_json(DATASET).unwrap(),
        &CacheConfig::default(),
    )
}

fn journey_path(src: &str, dest: &str, start: &str) -> Path<(String, String, String)> {
    Path((src.to_string(), dest.to_string(), start.to_string()))
}

async fn error_body(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_check() {
    assert_eq!(health().await, "ok");
}

#[tokio::test]
async fn spanning_tree_pairs() {
    let Json(tree) = spanning_tree(State(state())).await.unwrap();
    let pairs: Vec<(&str, &str)> = tree.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    assert_eq!(pairs, vec![("B", "C"), ("C", "D"), ("A", "B")]);

    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json[0], serde_json::json!(["B", "C"]));
}

#[tokio::test]
async fn spanning_tree_points_with_names() {
    let Json(points) = spanning_tree_points(State(state())).await.unwrap();
    let names: Vec<&str> = points.iter().map(|p| p.stop_name.as_str()).collect();
    assert_eq!(names, vec!["Bravo", "Charlie", "Delta", "Alpha"]);
}

#[tokio::test]
async fn static_network_is_cached() {
    let state = state();
    spanning_tree(State(state.clone())).await.unwrap();
    static_shortest_path(State(state.clone()), Path((0, 3)))
        .await
        .unwrap();

    state.cache.sync().await;
    assert_eq!(state.cache.entry_count(), 1);
    assert!(state.cache.get_static("test").await.is_some());
}

#[tokio::test]
async fn dijkstra_example() {
    let Json(response) = static_shortest_path(State(state()), Path((0, 3)))
        .await
        .unwrap();
    assert_eq!(response.distance, Some(7));
    assert_eq!(response.path, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn dijkstra_out_of_range_is_bad_request() {
    let err = static_shortest_path(State(state()), Path((0, 4)))
        .await
        .unwrap_err();
    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("out of range"));
}

#[tokio::test]
async fn journey_example() {
    let Json(response) = journey(
        State(state()),
        journey_path("A", "C", "2024-05-10 07:50:00"),
    )
    .await
    .unwrap();

    assert_eq!(response.total_time, 35 * 60);
    assert_eq!(response.arrival_time, "2024-05-10 08:25:00");
    let stops: Vec<(&str, &str)> = response
        .path
        .iter()
        .map(|s| (s.stop_id.as_str(), s.stop_name.as_str()))
        .collect();
    assert_eq!(
        stops,
        vec![("A", "Alpha"), ("B", "Bravo"), ("C", "Charlie")]
    );
    assert_eq!(response.path[2].trip_id.as_deref(), Some("T2"));
    assert_eq!(response.path[2].route_id.as_deref(), Some("R2"));
    assert_eq!(response.path[2].route_name.as_deref(), Some("Ligne 2"));
    assert_eq!(response.path[2].trip_headsign.as_deref(), Some("Charlie"));

    // T1 carries no route fields
    assert_eq!(response.path[1].trip_id.as_deref(), Some("T1"));
    assert_eq!(response.path[1].route_name, None);
}

#[tokio::test]
async fn journey_missed_connection_is_not_found() {
    let err = journey(
        State(state()),
        journey_path("A", "C", "2024-05-10 08:21:00"),
    )
    .await
    .unwrap_err();
    let (status, body) = error_body(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No path found");
}

#[tokio::test]
async fn journey_unknown_stop_is_bad_request() {
    let err = journey(
        State(state()),
        journey_path("A", "nowhere", "2024-05-10 07:50:00"),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn journey_bad_time_is_bad_request() {
    let err = journey(State(state()), journey_path("A", "C", "10/05/2024 07:50"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn journey_same_stop() {
    let Json(response) = journey(
        State(state()),
        journey_path("D", "D", "2024-05-10 07:50:00"),
    )
    .await
    .unwrap();
    assert_eq!(response.total_time, 0);
    assert_eq!(response.path.len(), 1);
    assert_eq!(response.arrival_time, "2024-05-10 07:50:00");
}

#[tokio::test]
async fn timetable_cached_per_date() {
    let state = state();
    for start in ["2024-05-10 07:50:00", "2024-05-10 07:55:00", "2024-05-11 07:50:00"] {
        journey(State(state.clone()), journey_path("A", "C", start))
            .await
            .unwrap();
    }
    state.cache.sync().await;
    assert_eq!(state.cache.entry_count(), 2);
}

#[tokio::test]
async fn line_listing() {
    let Json(names) = lines(State(state())).await.unwrap();
    assert_eq!(names, vec!["ligne1".to_string(), "ligne2".to_string()]);

    let Json(stops) = line_stops(State(state()), Path("ligne1".to_string()))
        .await
        .unwrap();
    let ids: Vec<&str> = stops.iter().map(|s| s.stop_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
}

#[tokio::test]
async fn unknown_line_is_not_found() {
    let err = line_stops(State(state()), Path("ligne99".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn single_line_stop() {
    let Json(stop) = line_stop(
        State(state()),
        Path(("ligne1".to_string(), "B".to_string())),
    )
    .await
    .unwrap();
    assert_eq!(stop.stop_sequence, 2);

    let err = line_stop(
        State(state()),
        Path(("ligne2".to_string(), "A".to_string())),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stations_along_lines() {
    let Json(placed) = stations(State(state())).await.unwrap();
    let rows: Vec<(&str, &str, u32, Option<u32>, Option<u32>)> = placed
        .iter()
        .map(|s| {
            (
                s.line.as_str(),
                s.line_stop_id.as_str(),
                s.station.0,
                s.prev_station.map(|p| p.0),
                s.next_station.map(|n| n.0),
            )
        })
        .collect();
    // X has no merged station
    assert_eq!(
        rows,
        vec![
            ("ligne1", "A", 0, None, Some(1)),
            ("ligne1", "B", 1, Some(0), None),
            ("ligne2", "C", 2, None, None),
        ]
    );

    let json = serde_json::to_value(&placed[1]).unwrap();
    assert_eq!(json["stop_ids"], serde_json::json!(["B", "B2"]));
    assert_eq!(json["prev_stop_id"], 0);
    assert_eq!(json["next_stop_id"], serde_json::Value::Null);
}

#[test]
fn error_mapping() {
    let e: AppError = QueryError::Graph(GraphError::OutOfRange { index: 9, len: 4 }).into();
    assert_eq!(e.status(), StatusCode::BAD_REQUEST);

    let e: AppError = QueryError::Graph(GraphError::stop_not_found("X")).into();
    assert_eq!(e.status(), StatusCode::BAD_REQUEST);

    let e: AppError = ProviderError::LineNotFound("ligne99".into()).into();
    assert_eq!(e.status(), StatusCode::NOT_FOUND);

    let trip = crate::domain::TripId::new("T9").unwrap();
    let e: AppError = ProviderError::TripNotFound(trip).into();
    assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let e: AppError = ProviderError::Io {
        path: "/missing.json".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    }
    .into();
    assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
