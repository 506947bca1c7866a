use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::engine::ValuationError;
use super::pricing::BasePriceResolver;
use super::service::{OnRoadRequest, ValuationService, ValuationSubmission};

/// Router exposing valuation and on-road pricing endpoints.
pub fn valuation_router<R>(service: Arc<ValuationService<R>>) -> Router
where
    R: BasePriceResolver + 'static,
{
    Router::new()
        .route("/api/v1/valuations", post(appraise_handler::<R>))
        .route("/api/v1/on-road-price", post(on_road_handler::<R>))
        .with_state(service)
}

pub(crate) async fn appraise_handler<R>(
    State(service): State<Arc<ValuationService<R>>>,
    body: Result<axum::Json<ValuationSubmission>, JsonRejection>,
) -> Response
where
    R: BasePriceResolver + 'static,
{
    let axum::Json(submission) = match body {
        Ok(body) => body,
        Err(rejection) => return malformed_body(rejection),
    };
    match service.appraise(submission) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => rejection(error),
    }
}

pub(crate) async fn on_road_handler<R>(
    State(service): State<Arc<ValuationService<R>>>,
    body: Result<axum::Json<OnRoadRequest>, JsonRejection>,
) -> Response
where
    R: BasePriceResolver + 'static,
{
    let axum::Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return malformed_body(rejection),
    };
    match service.on_road(request) {
        Ok(breakdown) => (StatusCode::OK, axum::Json(breakdown)).into_response(),
        Err(error) => rejection(error),
    }
}

fn rejection(error: ValuationError) -> Response {
    match error {
        ValuationError::InvalidInput(violation) => {
            let payload = json!({
                "error": violation.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

/// Bodies that fail to deserialize (negative odometer, unknown enum variant)
/// get the same `{"error"}` shape as validation failures.
fn malformed_body(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
    });
    (rejection.status(), axum::Json(payload)).into_response()
}
