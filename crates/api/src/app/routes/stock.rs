use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use brewstock_core::StockId;

use crate::app::dto::{self, StockResponse};
use crate::app::errors;
use crate::app::services::AppServices;

// `/:key` is a name for GET and an id for DELETE; both methods share one route.
pub fn router() -> Router {
    Router::new()
        .route("/", post(create_stock).get(list_stock))
        .route("/:key", get(find_by_name).delete(delete_by_id))
        .route("/:key/increment", patch(increment))
}

pub async fn create_stock(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::StockRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", e.body_text()),
    };

    let new_stock = match body.into_new_stock() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.create(new_stock).await {
        Ok(stock) => (StatusCode::CREATED, Json(StockResponse::from(stock))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn find_by_name(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.find_by_name(&name).await {
        Ok(stock) => (StatusCode::OK, Json(StockResponse::from(stock))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn list_stock(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.list_all().await {
        Ok(all) => {
            let body: Vec<StockResponse> = all.iter().map(StockResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn delete_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
) -> axum::response::Response {
    let id: StockId = match key.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.delete_by_id(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn increment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(key): Path<String>,
    body: Result<Json<dto::QuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    let id: StockId = match key.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", e.body_text()),
    };

    let amount = match body.amount() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.increment(id, amount).await {
        Ok(stock) => (StatusCode::OK, Json(StockResponse::from(stock))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}
