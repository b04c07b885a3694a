use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use brewstock_core::DomainError;
use brewstock_stock::StockError;

pub fn stock_error_to_response(err: StockError) -> axum::response::Response {
    match err {
        StockError::AlreadyRegistered(_) => {
            json_error(StatusCode::BAD_REQUEST, "already_registered", err.to_string())
        }
        StockError::NotFoundByName(_) | StockError::NotFoundById(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        StockError::Exceeded { .. } => {
            json_error(StatusCode::BAD_REQUEST, "exceeded", err.to_string())
        }
        StockError::Store(e) => {
            tracing::error!(error = %e, "stock store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal storage error",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewstock_core::StockId;
    use brewstock_stock::StoreError;

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn business_rejections_map_to_client_errors() {
        let cases = [
            (
                StockError::AlreadyRegistered("Brahma".into()),
                StatusCode::BAD_REQUEST,
                "already_registered",
            ),
            (
                StockError::NotFoundByName("Brahma".into()),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                StockError::NotFoundById(StockId::new(3)),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                StockError::Exceeded { id: StockId::new(3), amount: 41 },
                StatusCode::BAD_REQUEST,
                "exceeded",
            ),
        ];

        for (err, status, code) in cases {
            let message = err.to_string();
            let res = stock_error_to_response(err);
            assert_eq!(res.status(), status);
            let body = body_json(res).await;
            assert_eq!(body["error"], code);
            assert_eq!(body["message"], message);
        }
    }

    #[tokio::test]
    async fn store_failure_is_internal_and_hides_details() {
        let res = stock_error_to_response(StockError::Store(StoreError::backend("db down")));

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(res).await;
        assert_eq!(body["error"], "store_error");
        assert_eq!(body["message"], "internal storage error");
    }

    #[tokio::test]
    async fn domain_errors_are_bad_requests() {
        let res = domain_error_to_response(DomainError::validation("brand is required"));
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "validation_error");

        let res = domain_error_to_response(DomainError::invalid_id("StockId: abc"));
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "invalid_id");
    }
}
