use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use appointment_cell::{appointment_routes, AppointmentState};
use call_cell::{call_routes, CallState};

pub fn create_router(appointments: AppointmentState, calls: CallState) -> Router {
    Router::new()
        .route("/", get(health))
        .merge(appointment_routes(appointments))
        .merge(call_routes(calls))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "AI Receptionist Backend Running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use call_cell::{CallLogWorker, VapiClient};
    use shared_database::AirtableClient;
    use shared_utils::test_utils::TestConfig;

    use super::*;

    fn test_router() -> (Router, CallLogWorker) {
        let config = TestConfig::default().to_arc();
        let store = Arc::new(AirtableClient::new(&config).unwrap());
        let (queue, worker) = CallLogWorker::spawn(store.clone(), config.logs_table.clone());
        let relay = Arc::new(VapiClient::new(&config).unwrap());

        let router = create_router(
            AppointmentState::new(config, store),
            CallState::new(relay, queue),
        );
        (router, worker)
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _worker) = test_router();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "AI Receptionist Backend Running");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert!(chrono::DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (app, _worker) = test_router();

        let response = app
            .oneshot(Request::builder().uri("/patients").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let (app, _worker) = test_router();

        let response = app
            .oneshot(Request::builder().uri("/book-appointment").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
