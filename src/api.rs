use std::sync::Arc;

use axum::{
    Router,
    extract::{FromRequest, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    ScooterHubError,
    diagnostic::TreeDescription,
    directory::LocationDirectory,
    models::{Coordinates, Location, LocationDraft, Scooter},
};

pub type SharedDirectory = Arc<LocationDirectory>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failed,
}

/// Envelope shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub result: Outcome,
    pub message: T,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ScooterHubError>;

fn success<T>(message: T) -> ApiResult<T> {
    Ok(Json(ApiResponse {
        result: Outcome::Success,
        message,
    }))
}

/// JSON body whose rejections are answered with the error envelope
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ScooterHubError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ScooterHubError {
    fn from(rejection: JsonRejection) -> Self {
        ScooterHubError::validation(rejection.body_text())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationIdRequest {
    pub location_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PointRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct NearestLocation {
    #[serde(flatten)]
    pub location: Location,
    pub distance: f64,
}

impl IntoResponse for ScooterHubError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScooterHubError::NotFound { .. } => StatusCode::NOT_FOUND,
            ScooterHubError::DuplicateKey { .. } => StatusCode::CONFLICT,
            ScooterHubError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        let body = ApiResponse {
            result: Outcome::Failed,
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(directory: SharedDirectory) -> Router {
    Router::new()
        .route("/location/list", get(list_locations))
        .route("/location/search", post(search_location))
        .route("/location/nearest", post(nearest_location))
        .route("/location/goodscooter", post(good_scooter))
        .route("/location/add", post(add_location))
        .route("/location/remove", post(remove_location))
        .route("/location/tree", get(location_tree))
        .with_state(directory)
}

async fn list_locations(State(directory): State<SharedDirectory>) -> ApiResult<Vec<Location>> {
    success(directory.list().await)
}

async fn search_location(
    State(directory): State<SharedDirectory>,
    ApiJson(request): ApiJson<LocationIdRequest>,
) -> ApiResult<Location> {
    success(directory.search(&request.location_id).await?)
}

async fn nearest_location(
    State(directory): State<SharedDirectory>,
    ApiJson(request): ApiJson<PointRequest>,
) -> ApiResult<NearestLocation> {
    let point = Coordinates::new(request.latitude, request.longitude);
    let (location, distance) = directory.nearest(point).await?;
    success(NearestLocation { location, distance })
}

async fn good_scooter(
    State(directory): State<SharedDirectory>,
    ApiJson(request): ApiJson<LocationIdRequest>,
) -> ApiResult<Scooter> {
    success(directory.best_scooter(&request.location_id).await?)
}

async fn add_location(
    State(directory): State<SharedDirectory>,
    ApiJson(draft): ApiJson<LocationDraft>,
) -> ApiResult<Location> {
    success(directory.add(draft).await?)
}

async fn remove_location(
    State(directory): State<SharedDirectory>,
    ApiJson(request): ApiJson<LocationIdRequest>,
) -> ApiResult<Location> {
    success(directory.remove(&request.location_id).await?)
}

async fn location_tree(State(directory): State<SharedDirectory>) -> ApiResult<TreeDescription> {
    success(directory.tree().await)
}
