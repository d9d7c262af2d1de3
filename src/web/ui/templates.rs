use askama::Template;
use askama_web::WebTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "orbits.html")]
pub struct OrbitsTemplate {
    pub satellite_count: usize,
}
