use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::elements::ElementStore;

use super::api::elements as element_handlers;
use super::api::satellites as satellite_handlers;
use super::api::simulation as simulation_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::ui::handlers as ui_handlers;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub elements: Arc<RwLock<ElementStore>>,
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();

    let mut store = ElementStore::new(
        config.elements.tle_dir.clone(),
        config.elements.max_age,
    );
    if let Err(e) = store.reload() {
        log::warn!("Failed to load element sets: {}", e);
    }

    let state = AppState {
        config: Arc::new(config),
        elements: Arc::new(RwLock::new(store)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // UI routes
        .route("/", get(ui_handlers::orbits))
        // API endpoints
        .route(
            "/api/simulation",
            get(simulation_handlers::get_simulation),
        )
        .route(
            "/api/satellites",
            get(satellite_handlers::list_satellites),
        )
        .route(
            "/api/elements/reload",
            post(element_handlers::reload_elements),
        )
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
