use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::web::api::error::ApiResult;
use crate::web::server::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SatelliteStatus {
    pub name: String,
    pub catnr: u64,
    pub has_elements: bool,
    /// Age of the cached element set in hours, when one is on file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_hours: Option<i64>,
    pub stale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SatellitesResponse {
    pub satellites: Vec<SatelliteStatus>,
}

#[utoipa::path(
    get,
    path = "/api/satellites",
    tag = "satellites",
    responses(
        (status = 200, description = "Configured satellites and element freshness", body = SatellitesResponse)
    )
)]
pub async fn list_satellites(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let store = state.elements.read().await;
    let now = Utc::now();

    let satellites = state
        .config
        .satellites
        .iter()
        .map(|sat| match store.peek(sat.catnr) {
            Some(set) => SatelliteStatus {
                name: sat.name.clone(),
                catnr: sat.catnr,
                has_elements: true,
                age_hours: Some(set.age(now).num_hours()),
                stale: store.is_stale(set),
                source: Some(set.source.clone()),
            },
            None => SatelliteStatus {
                name: sat.name.clone(),
                catnr: sat.catnr,
                has_elements: false,
                age_hours: None,
                stale: false,
                source: None,
            },
        })
        .collect();

    Ok((StatusCode::OK, Json(SatellitesResponse { satellites })))
}
