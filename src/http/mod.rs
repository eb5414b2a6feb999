use crate::app::App;
use crate::errors::ToolError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;

pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/detail/instance", get(instance_detail))
        .with_state(app)
}

/// GET /detail/instance - instances of the configured demo service.
async fn instance_detail(State(app): State<Arc<App>>) -> Response {
    match app.client.demo_instances(&app.config.demo).await {
        Ok(hosts) => Json(hosts).into_response(),
        Err(err) => {
            app.logger.error(
                "instance detail failed",
                Some(&serde_json::json!({
                    "service": app.config.demo.service,
                    "kind": err.kind.as_str(),
                    "error": err.message,
                })),
            );
            (StatusCode::INTERNAL_SERVER_ERROR, err.message).into_response()
        }
    }
}

pub async fn serve(app: Arc<App>, addr: SocketAddr) -> Result<(), ToolError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    app.logger.info(
        "REST endpoint listening",
        Some(&serde_json::json!({ "addr": addr.to_string() })),
    );
    axum::serve(listener, router(app)).await?;
    Ok(())
}
