use aide::scalar::Scalar;
use axum::{extract::FromRef, middleware, response::IntoResponse, routing::get, Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::{
    config::config,
    db::{self, DB},
    errors::{self, on_error, ErrorResponseDocs},
    openapi::{
        self,
        aide::axum::ApiRouter,
        OpenApi,
    },
};

#[derive(FromRef, Clone)]
pub struct AppState {
    pub conn: DB,
}

pub struct AppParams<Router>
where
    Router: FnOnce(AppState) -> ApiRouter,
{
    pub db: DB,
    pub router: Router,
}

pub async fn create<R>(AppParams { db, router }: AppParams<R>) -> errors::Result<(Router, OpenApi)>
where
    R: FnOnce(AppState) -> ApiRouter,
{
    let mut api = OpenApi::default();

    let state = AppState { conn: db.clone() };

    let docs_router = axum::Router::new()
        .route(
            "/__docs__",
            get(Scalar::new("/__docs__/spec.json").with_title("Ideora API").axum_handler()),
        )
        .route("/__docs__/spec.json", get(serve_docs));

    let app = ApiRouter::new()
        .route("/__version__", get(version))
        .route("/__heartbeat__", get(heartbeat))
        .route("/__lbheartbeat__", get(lbheartbeat))
        .merge(docs_router)
        .merge(router(state.clone()))
        .finish_api_with(&mut api, |t| {
            t.title("Ideora").default_response::<openapi::Json<ErrorResponseDocs>>()
        })
        .layer(
            ServiceBuilder::new()
                .layer(Extension(db))
                .layer(Extension(Arc::new(api.clone())))
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(on_error)),
        );

    Ok((app, api))
}

async fn version() -> impl IntoResponse {
    let config = config();
    Json(json!({
        "source" : config.source,
        "version": config.version,
        "commit" : config.git_commit,
        "build"  : config.pipeline_id
    }))
}

async fn heartbeat(Extension(db): Extension<DB>) -> errors::Result<impl IntoResponse> {
    db::ping(&db).await.map_err(errors::Error::from).map_err(|e| e.on_read("Database unreachable"))?;

    Ok(Json(json!({ "status": "ok" })))
}

async fn lbheartbeat() -> impl IntoResponse {
    ""
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoResponse {
    Json(api.as_ref()).into_response()
}

#[cfg(test)]
mod tests {
    use crate::{db::init_test_db, dreams, errors::Result, goals, guidance};
    use aide::axum::ApiRouter;
    use serde_json::Value;

    #[tokio::test]
    async fn service_endpoints() -> Result<()> {
        let db = init_test_db().await?;
        let server = crate::tests::test_server(db, |_| ApiRouter::new()).await?;

        let response = server.get("/__heartbeat__").await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json::<Value>()["status"], "ok");

        assert_eq!(server.get("/__lbheartbeat__").await.status_code(), 200);
        assert_eq!(server.get("/__version__").await.json::<Value>()["version"], "test");
        Ok(())
    }

    #[tokio::test]
    async fn spec_lists_every_resource() -> Result<()> {
        let db = init_test_db().await?;
        let server = crate::tests::test_server(db, |state| {
            ApiRouter::new()
                .merge(dreams::router(state.clone()))
                .merge(goals::router(state))
                .merge(guidance::router())
        })
        .await?;

        let spec = server.get("/__docs__/spec.json").await.json::<Value>();
        let paths = spec["paths"].as_object().unwrap();

        for path in [
            "/api/dreams",
            "/api/dreams/{id}",
            "/api/goals",
            "/api/goals/{id}",
            "/api/goals/{id}/convert",
            "/api/inspiration",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        Ok(())
    }
}
