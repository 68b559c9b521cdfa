use axum::{body::Body, http::Request, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{self, TraceLayer},
};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::Config;

const DEFAULT_FILTER: &str = "ideora_api=debug,tower_http=debug,axum::rejection=trace";

pub fn setup_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let tracing = tracing_subscriber::registry()
        .with(filter)
        .with(config.tokio_console.then(console_subscriber::spawn));

    let initialized = if config.log_json {
        tracing.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        tracing
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_target(false),
            )
            .try_init()
    };

    // a subscriber is already set, e.g. under test
    initialized.ok();
}

pub fn add_tracing_layer(app: Router) -> Router {
    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get("x-request-id")
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or_default();
                        tracing::span!(
                            tracing::Level::DEBUG,
                            "request",
                            method = %request.method(),
                            request_id = request_id,
                            uri = %request.uri(),
                        )
                    })
                    .on_request(trace::DefaultOnRequest::new())
                    .on_response(trace::DefaultOnResponse::new().include_headers(false))
                    .on_failure(trace::DefaultOnFailure::new()),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderName, HeaderValue},
        routing::get,
    };
    use axum_test::TestServer;

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let app = add_tracing_layer(Router::new().route("/", get(|| async { "" })));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/").await;

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn incoming_request_id_is_kept() {
        let app = add_tracing_layer(Router::new().route("/", get(|| async { "" })));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/").add_header(HeaderName::from_static("x-request-id"), HeaderValue::from_static("abc-123")).await;

        assert_eq!(response.header("x-request-id"), "abc-123");
    }
}
