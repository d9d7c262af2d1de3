use axum::{extract::State, response::IntoResponse};

use crate::web::server::AppState;

use super::templates::OrbitsTemplate;

pub async fn orbits(State(state): State<AppState>) -> impl IntoResponse {
    OrbitsTemplate {
        satellite_count: state.config.satellites.len(),
    }
}
