//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::domain::{LineId, StationId, TopologyError};
use crate::service::{CreateLine, ServiceError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", post(create_station).get(list_all_stations))
        .route("/stations/:id", delete(delete_station))
        .route("/lines", post(create_line).get(list_lines))
        .route(
            "/lines/:id",
            get(show_line).put(update_line).delete(delete_line),
        )
        .route("/lines/:id/sections", post(add_section).delete(remove_station))
        .route("/lines/:id/stations", get(line_stations))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn create_station(
    State(state): State<AppState>,
    Json(req): Json<StationRequest>,
) -> Result<(StatusCode, Json<StationResponse>), AppError> {
    let station = state.topology.create_station(&req.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(StationResponse::from_station(&station)),
    ))
}

async fn list_all_stations(
    State(state): State<AppState>,
) -> Result<Json<Vec<StationResponse>>, AppError> {
    let stations = state.topology.find_stations().await?;
    Ok(Json(
        stations.iter().map(StationResponse::from_station).collect(),
    ))
}

async fn delete_station(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.topology.delete_station(StationId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_line(
    State(state): State<AppState>,
    Json(req): Json<LineRequest>,
) -> Result<(StatusCode, Json<LineResponse>), AppError> {
    let view = state
        .topology
        .create_line(CreateLine {
            name: req.name,
            color: req.color,
            up_station_id: StationId(req.up_station_id),
            down_station_id: StationId(req.down_station_id),
            distance: req.distance,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(LineResponse::from_view(&view))))
}

async fn list_lines(State(state): State<AppState>) -> Result<Json<Vec<LineResponse>>, AppError> {
    let views = state.topology.find_lines().await?;
    Ok(Json(views.iter().map(LineResponse::from_view).collect()))
}

async fn show_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<LineResponse>, AppError> {
    let view = state.topology.find_line(LineId(id)).await?;
    Ok(Json(LineResponse::from_view(&view)))
}

async fn update_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<LineUpdateRequest>,
) -> Result<Json<LineResponse>, AppError> {
    let view = state
        .topology
        .update_line(LineId(id), &req.name, &req.color)
        .await?;
    Ok(Json(LineResponse::from_view(&view)))
}

async fn delete_line(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.topology.delete_line(LineId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a section, splitting an existing one if it lands inside it.
async fn add_section(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<SectionRequest>,
) -> Result<Json<LineResponse>, AppError> {
    let view = state
        .topology
        .add_section(
            LineId(id),
            StationId(req.up_station_id),
            StationId(req.down_station_id),
            req.distance,
        )
        .await?;
    Ok(Json(LineResponse::from_view(&view)))
}

/// Remove a station from a line, merging the sections around it.
async fn remove_station(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(query): Query<RemoveStationQuery>,
) -> Result<StatusCode, AppError> {
    state
        .topology
        .remove_station(LineId(id), StationId(query.station_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn line_stations(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<StationResponse>>, AppError> {
    let stations = state.topology.list_stations(LineId(id)).await?;
    Ok(Json(
        stations.iter().map(StationResponse::from_station).collect(),
    ))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            ServiceError::NotFound(_) => AppError::NotFound { message },
            ServiceError::StationInUse(..)
            | ServiceError::Topology(TopologyError::DuplicateSection(..)) => {
                AppError::Conflict { message }
            }
            ServiceError::Topology(err) if err.is_corruption() => AppError::Internal { message },
            ServiceError::Topology(_) | ServiceError::InvalidInput(_) => {
                AppError::BadRequest { message }
            }
            ServiceError::Repository(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            tracing::error!(%status, %message, "request failed");
        } else {
            tracing::debug!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, CachedStationRepository};
    use crate::repository::MemoryStore;
    use crate::service::LineTopologyService;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let store = MemoryStore::new();
        let stations = CachedStationRepository::new(store.clone(), &CacheConfig::default());
        create_router(AppState::new(LineTopologyService::new(stations, store)))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn station(app: &Router, name: &str) -> u64 {
        let (status, body) = send(app, "POST", "/stations", Some(json!({ "name": name }))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_u64().unwrap()
    }

    async fn line(app: &Router, up: u64, down: u64, distance: i64) -> u64 {
        let (status, body) = send(
            app,
            "POST",
            "/lines",
            Some(json!({
                "name": "Line 2",
                "color": "bg-green-600",
                "upStationId": up,
                "downStationId": down,
                "distance": distance,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_u64().unwrap()
    }

    fn station_names(body: &Value) -> Vec<String> {
        body["stations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn health_check() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn split_section_over_http() {
        let app = app();
        let a = station(&app, "Gangnam").await;
        let b = station(&app, "Yeoksam").await;
        let c = station(&app, "Seolleung").await;
        let id = line(&app, a, b, 10).await;

        let (status, body) = send(
            &app,
            "POST",
            &format!("/lines/{id}/sections"),
            Some(json!({ "upStationId": a, "downStationId": c, "distance": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(station_names(&body), vec!["Gangnam", "Seolleung", "Yeoksam"]);
        assert_eq!(body["sections"][1]["distance"], 7);

        let (status, body) = send(&app, "GET", &format!("/lines/{id}/stations"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn errors_map_to_status_codes() {
        let app = app();
        let a = station(&app, "Gangnam").await;
        let b = station(&app, "Yeoksam").await;
        let c = station(&app, "Seolleung").await;
        let id = line(&app, a, b, 10).await;
        let sections = format!("/lines/{id}/sections");

        // Split that would leave nothing of the existing section
        let (status, body) = send(
            &app,
            "POST",
            &sections,
            Some(json!({ "upStationId": a, "downStationId": c, "distance": 10 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("distance"));

        let (status, _) = send(
            &app,
            "POST",
            &sections,
            Some(json!({ "upStationId": a, "downStationId": b, "distance": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            "POST",
            &sections,
            Some(json!({ "upStationId": a, "downStationId": 99, "distance": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/lines/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", &format!("/stations/{a}"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&app, "DELETE", &format!("{sections}?stationId={a}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn line_lifecycle() {
        let app = app();
        let a = station(&app, "Gangnam").await;
        let b = station(&app, "Yeoksam").await;
        let c = station(&app, "Seolleung").await;
        let id = line(&app, a, b, 10).await;

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/lines/{id}"),
            Some(json!({ "name": "Shinbundang", "color": "bg-red-600" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Shinbundang");

        send(
            &app,
            "POST",
            &format!("/lines/{id}/sections"),
            Some(json!({ "upStationId": b, "downStationId": c, "distance": 5 })),
        )
        .await;
        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/lines/{id}/sections?stationId={b}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", &format!("/lines/{id}"), None).await;
        assert_eq!(station_names(&body), vec!["Gangnam", "Seolleung"]);
        assert_eq!(body["sections"][0]["distance"], 15);

        let (status, _) = send(&app, "DELETE", &format!("/lines/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, "GET", "/lines", None).await;
        assert!(body.as_array().unwrap().is_empty());

        let (status, _) = send(&app, "DELETE", &format!("/stations/{b}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, "GET", "/stations", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }
}
