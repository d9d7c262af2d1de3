use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::scene::{self, SphereMesh};
use crate::sim::{
    self, Frame, ReferenceFrame, SkippedObject, TimeGrid,
};
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::server::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SimulationQuery {
    /// Window start (RFC3339); defaults to the configured start.
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub start: Option<DateTime<Utc>>,
    pub duration_days: Option<i64>,
    pub step_minutes: Option<i64>,
    pub trail_minutes: Option<i64>,
    pub frame: Option<ReferenceFrame>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SatelliteTrace {
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SimulationResponse {
    pub start: DateTime<Utc>,
    pub step_minutes: i64,
    pub frame: ReferenceFrame,
    pub trail_samples: usize,
    pub timestamps: Vec<DateTime<Utc>>,
    pub earth: SphereMesh,
    /// One entry per render slot, in frame object order.
    pub satellites: Vec<SatelliteTrace>,
    pub frames: Vec<Frame>,
    /// Objects dropped from this run, with reasons.
    pub skipped: Vec<SkippedObject>,
}

#[utoipa::path(
    get,
    path = "/api/simulation",
    tag = "simulation",
    params(
        ("start" = Option<String>, Query, description = "Window start (RFC3339)"),
        ("duration_days" = Option<i64>, Query, description = "Window length in days (7-35)"),
        ("step_minutes" = Option<i64>, Query, description = "Sample step in minutes (5-120)"),
        ("trail_minutes" = Option<i64>, Query, description = "Trail duration in minutes"),
        ("frame" = Option<String>, Query, description = "Coordinate frame: eci or ecef")
    ),
    responses(
        (status = 200, description = "Propagated frames", body = SimulationResponse),
        (status = 400, description = "Invalid parameters"),
        (status = 503, description = "Element sets unavailable")
    )
)]
pub async fn get_simulation(
    State(state): State<AppState>,
    Query(query): Query<SimulationQuery>,
) -> ApiResult<impl IntoResponse> {
    let defaults = &state.config.simulation;
    let start = query
        .start
        .or(defaults.start)
        .unwrap_or_else(default_start);
    let duration_days = query.duration_days.unwrap_or(defaults.duration_days);
    let step_minutes = query.step_minutes.unwrap_or(defaults.step_minutes);
    let frame = query.frame.unwrap_or(defaults.frame);
    let trail = query
        .trail_minutes
        .map(Duration::minutes)
        .unwrap_or(defaults.trail);

    let grid = TimeGrid::build(start, duration_days, step_minutes)?;

    let mut sets = Vec::with_capacity(state.config.satellites.len());
    let mut skipped = Vec::new();
    {
        let store = state.elements.read().await;
        for sat in &state.config.satellites {
            match store.lookup(sat.catnr) {
                Ok(stored) => sets.push(stored.element_set(&sat.name)),
                Err(e) => {
                    log::warn!("No element set for {}: {}", sat.name, e);
                    skipped.push(SkippedObject {
                        name: sat.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    if sets.is_empty() {
        return Err(ApiError::Validation(
            "no element sets available for any configured satellite".to_string(),
        ));
    }

    let batch = sim::propagate(&sets, &grid, frame == ReferenceFrame::Ecef);
    let trail_samples = sim::trail_samples(trail, grid.step_minutes());
    let frames = sim::assemble_frames(&batch, trail_samples, frame)?;
    skipped.extend(batch.skipped().iter().cloned());

    let satellites = batch
        .objects()
        .iter()
        .enumerate()
        .map(|(slot, (name, _))| SatelliteTrace {
            name: name.clone(),
            symbol: scene::marker_symbol(slot).to_string(),
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(SimulationResponse {
            start: grid.start(),
            step_minutes: grid.step_minutes(),
            frame,
            trail_samples,
            timestamps: grid.timestamps().to_vec(),
            earth: SphereMesh::earth(),
            satellites,
            frames,
            skipped,
        }),
    ))
}

/// Today at 00:00 UTC.
pub fn default_start() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn deserialize_opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    s.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    })
    .transpose()
}
