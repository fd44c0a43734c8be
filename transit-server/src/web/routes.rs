//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::{error, info, warn};

use crate::domain::{GraphError, StopId, VertexId, parse_timestamp};
use crate::engine::{LineStation, QueryError, earliest_arrival};
use crate::provider::{DataProvider, LineStop, ProviderError, StopRow};

use super::dto::*;
use super::state::{AppState, blocking};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/acpm", get(spanning_tree))
        .route("/acpm/points", get(spanning_tree_points))
        .route("/dijkstra/:src/:dest", get(static_shortest_path))
        .route("/journey/:src/:dest/:start_time", get(journey))
        .route("/lines", get(lines))
        .route("/stops/:line", get(line_stops))
        .route("/stop/:line/:stop_id", get(line_stop))
        .route("/stations", get(stations))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Minimum spanning tree as pairs of representative stop ids.
async fn spanning_tree(
    State(state): State<AppState>,
) -> Result<Json<Vec<(StopId, StopId)>>, AppError> {
    let network = state.static_network().await?;
    let tree = blocking(move || network.mst()).await?;
    Ok(Json(tree))
}

/// Stops touched by the minimum spanning tree.
async fn spanning_tree_points(
    State(state): State<AppState>,
) -> Result<Json<Vec<StopRow>>, AppError> {
    let network = state.static_network().await?;
    let engine = state.engine.clone();
    let points = blocking(move || {
        let tree = network.mst()?;
        engine.mst_points(&tree)
    })
    .await?;
    Ok(Json(points))
}

/// Static shortest path between two merged-station vertices.
async fn static_shortest_path(
    State(state): State<AppState>,
    Path((src, dest)): Path<(usize, usize)>,
) -> Result<Json<DijkstraResponse>, AppError> {
    let network = state.static_network().await?;
    let path = blocking(move || {
        network
            .weight_matrix()
            .shortest_path(VertexId(src), VertexId(dest))
    })
    .await?;
    Ok(Json(path.into()))
}

/// Earliest arrival between two stops, leaving no earlier than `start_time`.
async fn journey(
    State(state): State<AppState>,
    Path((src, dest, start_time)): Path<(String, String, String)>,
) -> Result<Json<JourneyResponse>, AppError> {
    let src = parse_stop(&src)?;
    let dest = parse_stop(&dest)?;
    let start_time = parse_timestamp(&start_time).map_err(|e| AppError::BadRequest {
        message: format!("Invalid start time {start_time}: {e}"),
    })?;

    state.engine.check_stops(&src, &dest)?;
    let network = state.timetable(start_time.date()).await?;

    let engine = state.engine.clone();
    let response = blocking(move || {
        let Some(itinerary) = earliest_arrival(&network, &src, &dest, start_time) else {
            return Err(AppError::NotFound {
                message: "No path found".into(),
            });
        };
        info!(
            %src,
            %dest,
            %start_time,
            arrival = %itinerary.arrival_time,
            stops = itinerary.path.len(),
            trips = itinerary.trips(),
            "journey found"
        );
        JourneyResponse::from_itinerary(&itinerary, engine.provider()).map_err(AppError::from)
    })
    .await?;
    Ok(Json(response))
}

/// Names of all lines.
async fn lines(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.engine.provider().line_names()?))
}

/// Stops of a line in sequence order.
async fn line_stops(
    State(state): State<AppState>,
    Path(line): Path<String>,
) -> Result<Json<Vec<LineStop>>, AppError> {
    Ok(Json(state.engine.provider().list_line_stops(&line)?))
}

/// One stop of a line.
async fn line_stop(
    State(state): State<AppState>,
    Path((line, stop_id)): Path<(String, String)>,
) -> Result<Json<LineStop>, AppError> {
    let stop_id = parse_stop(&stop_id)?;
    state
        .engine
        .provider()
        .list_line_stops(&line)?
        .into_iter()
        .find(|s| s.stop_id == stop_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound {
            message: format!("Stop {stop_id} not found on {line}"),
        })
}

/// Line stops placed on merged stations, with their neighbours on the line.
async fn stations(State(state): State<AppState>) -> Result<Json<Vec<LineStation>>, AppError> {
    let engine = state.engine.clone();
    let placed = blocking(move || engine.compute_line_stations()).await?;
    Ok(Json(placed))
}

fn parse_stop(s: &str) -> Result<StopId, AppError> {
    StopId::new(s).map_err(|e| AppError::BadRequest {
        message: format!("Invalid stop id {s:?}: {e}"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<GraphError> for AppError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::OutOfRange { .. } | GraphError::NotFound { .. } => AppError::BadRequest {
                message: e.to_string(),
            },
            GraphError::InvalidStation { .. } => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::StopNotFound(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            ProviderError::LineNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            ProviderError::TripNotFound(_) | ProviderError::Io { .. } | ProviderError::Json(_) => {
                AppError::Internal {
                    message: e.to_string(),
                }
            }
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Graph(e) => e.into(),
            QueryError::Provider(e) => e.into(),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
