use utoipa::OpenApi;

use super::api::elements::ReloadResponse;
use super::api::error::ErrorResponse;
use super::api::satellites::{SatelliteStatus, SatellitesResponse};
use super::api::simulation::{SatelliteTrace, SimulationResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::simulation::get_simulation,
        super::api::satellites::list_satellites,
        super::api::elements::reload_elements,
    ),
    components(
        schemas(
            SimulationResponse,
            SatelliteTrace,
            SatellitesResponse,
            SatelliteStatus,
            ReloadResponse,
            ErrorResponse,
            crate::scene::SphereMesh,
            crate::sim::Frame,
            crate::sim::ObjectFrame,
            crate::sim::SkippedObject,
            crate::sim::ReferenceFrame,
        )
    ),
    info(
        title = "Orbitarium API",
        description = "Animated satellite orbit propagation and frame assembly",
        version = "0.1.0"
    ),
    tags(
        (name = "simulation", description = "Orbit propagation and animation frames"),
        (name = "satellites", description = "Tracked satellite status"),
        (name = "elements", description = "Element-set cache management")
    )
)]
pub struct ApiDoc;
