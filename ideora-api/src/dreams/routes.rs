use crate::{
    app::AppState,
    ctx::BaseParams,
    openapi::{
        aide::{
            axum::{
                routing::{get, post},
                ApiRouter, IntoApiResponse,
            },
            NoApi,
        },
        Json, Path, Query,
    },
};
use axum::http::StatusCode;

use schemars::JsonSchema;

use serde::Deserialize;
use uuid::Uuid;

use super::{CreateDream, Dream, DreamFilter, UpdateDream};

use super::handlers;

#[derive(Debug, Deserialize, JsonSchema)]
struct DreamIdPath {
    id: Uuid,
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/api/dreams",
            get(find_dreams).post_with(create_dream, |t| t.response::<201, Json<Dream>>()),
        )
        .api_route("/api/dreams/{id}", get(get_dream).put(update_dream).delete(delete_dream))
        .api_route("/api/dreams/{id}/buddy", post(assign_buddy))
        .api_route("/api/dreams/{id}/plan", get(action_plan))
        .with_state(state)
}

async fn find_dreams(NoApi(base): NoApi<BaseParams>, Query(filter): Query<DreamFilter>) -> impl IntoApiResponse {
    handlers::find_dreams(filter, base).await.map(Json)
}

async fn create_dream(NoApi(base): NoApi<BaseParams>, Json(args): Json<CreateDream>) -> impl IntoApiResponse {
    handlers::create_dream(args, base)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

async fn get_dream(Path(DreamIdPath { id }): Path<DreamIdPath>, NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::get_dream(id, base).await.map(Json)
}

async fn update_dream(
    Path(DreamIdPath { id }): Path<DreamIdPath>,
    NoApi(base): NoApi<BaseParams>,
    Json(args): Json<UpdateDream>,
) -> impl IntoApiResponse {
    handlers::update_dream(id, args, base).await.map(Json)
}

async fn assign_buddy(
    Path(DreamIdPath { id }): Path<DreamIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::assign_buddy(id, base).await.map(Json)
}

async fn action_plan(
    Path(DreamIdPath { id }): Path<DreamIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::action_plan(id, base).await.map(Json)
}

async fn delete_dream(
    Path(DreamIdPath { id }): Path<DreamIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::delete_dream(id, base).await.map(Json)
}
