mod handlers;
mod model;
mod routes;

pub use model::*;

use crate::{app::AppState, openapi::aide::axum::ApiRouter};

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new().merge(routes::router(state.clone()))
}
