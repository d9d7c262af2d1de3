use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::web::api::error::{ApiError, ApiResult};
use crate::web::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReloadResponse {
    pub loaded: usize,
}

#[utoipa::path(
    post,
    path = "/api/elements/reload",
    tag = "elements",
    responses(
        (status = 200, description = "Element directory rescanned", body = ReloadResponse),
        (status = 503, description = "Element directory unavailable")
    )
)]
pub async fn reload_elements(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let mut store = state.elements.write().await;
    store.reload().map_err(ApiError::Provider)?;

    Ok((
        StatusCode::OK,
        Json(ReloadResponse {
            loaded: store.len(),
        }),
    ))
}
