//! JSON endpoints under `/api`
//!
//! Handlers only validate input, invoke the pipeline and map its results to status codes.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, error};

use crate::aggregator::Aggregator;
use crate::error::{GeocodeError, ProjectionError, ValidationError};
use crate::geocoding::CityGeocoder;
use crate::models::{AggregateResult, Coordinate, ProviderKind};
use crate::quality;
use crate::summary::{self, SummaryView};

/// Request-independent collaborators shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub geocoder: Arc<CityGeocoder>,
}

/// Failures surfaced to API callers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Caminho inválido: {0}")]
    InvalidPath(#[from] PathRejection),

    #[error("Coordenadas inválidas: {0}")]
    InvalidCoordinates(#[from] ValidationError),

    #[error("Erro ao buscar informações do local.")]
    NoProviderAnswered,

    #[error("Erro ao montar o resumo: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Cidade não encontrada.")]
    CityNotFound,

    #[error("Erro ao buscar coordenadas da cidade.")]
    Geocoding(#[from] GeocodeError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPath(rejection) => rejection.status(),
            ApiError::InvalidCoordinates(_) => StatusCode::BAD_REQUEST,
            ApiError::CityNotFound => StatusCode::NOT_FOUND,
            ApiError::NoProviderAnswered | ApiError::Projection(_) | ApiError::Geocoding(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::InvalidPath(e) => debug!("Rejected path: {}", e),
            ApiError::InvalidCoordinates(e) => debug!("Rejected coordinates: {}", e),
            ApiError::CityNotFound => debug!("{}", self),
            ApiError::Geocoding(e) => error!("Geocoding failed: {}", e),
            ApiError::NoProviderAnswered | ApiError::Projection(_) => error!("{}", self),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// 500 with a generic message for a handler that panicked; the cause stays in the log
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!("Request handler panicked: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Erro ao processar a requisição." })),
    )
        .into_response()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/local/{latitude}/{longitude}", get(get_local))
        .route("/local/resumo/{latitude}/{longitude}", get(get_local_summary))
        .route("/coordenadas/{city_name}", get(get_city_coordinates))
        .with_state(state)
}

/// Validate, fan out to every provider and run the advisory quality check
async fn aggregate(state: &AppState, latitude: &str, longitude: &str) -> Result<AggregateResult, ApiError> {
    let coordinate = Coordinate::validate(latitude, longitude)?;
    let result = state
        .aggregator
        .aggregate(&coordinate, &ProviderKind::ALL)
        .await;

    let report = quality::check(&result);
    if !report.is_clean() {
        debug!(
            "{} quality warning(s) for {}",
            report.warnings.len(),
            coordinate.format_coordinates()
        );
    }

    Ok(result)
}

async fn get_local(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<AggregateResult>, ApiError> {
    let Path((latitude, longitude)) = path?;
    let result = aggregate(&state, &latitude, &longitude).await?;
    if result.all_failed() {
        return Err(ApiError::NoProviderAnswered);
    }
    Ok(Json(result))
}

async fn get_local_summary(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<SummaryView>, ApiError> {
    let Path((latitude, longitude)) = path?;
    let result = aggregate(&state, &latitude, &longitude).await?;
    Ok(Json(summary::project(&result)?))
}

async fn get_city_coordinates(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(city_name) = path?;
    state
        .geocoder
        .lookup(&city_name)
        .await?
        .map(Json)
        .ok_or(ApiError::CityNotFound)
}
