//! Static geometry and styling handed to the renderer.

use serde::Serialize;
use utoipa::ToSchema;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Marker symbols assigned to render slots, cycling when the satellite
/// count exceeds the palette.
const MARKER_SYMBOLS: [&str; 10] = [
    "circle",
    "square",
    "diamond",
    "cross",
    "x",
    "triangle-up",
    "triangle-down",
    "triangle-left",
    "triangle-right",
    "star",
];

pub fn marker_symbol(slot: usize) -> &'static str {
    MARKER_SYMBOLS[slot % MARKER_SYMBOLS.len()]
}

/// Parametric sphere surface as three 2D coordinate grids, the shape a
/// surface plot consumes directly.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SphereMesh {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
    pub z: Vec<Vec<f64>>,
}

impl SphereMesh {
    /// Earth at its mean radius, kilometers, matching the trajectory units.
    pub fn earth() -> Self {
        Self::new(EARTH_RADIUS_KM, 50, 100)
    }

    pub fn new(radius: f64, lat_steps: usize, lon_steps: usize) -> Self {
        let mut x = Vec::with_capacity(lat_steps);
        let mut y = Vec::with_capacity(lat_steps);
        let mut z = Vec::with_capacity(lat_steps);

        for i in 0..lat_steps {
            let phi = std::f64::consts::PI * i as f64 / (lat_steps - 1) as f64;
            let mut row_x = Vec::with_capacity(lon_steps);
            let mut row_y = Vec::with_capacity(lon_steps);
            let mut row_z = Vec::with_capacity(lon_steps);
            for j in 0..lon_steps {
                let theta = 2.0 * std::f64::consts::PI * j as f64 / (lon_steps - 1) as f64;
                row_x.push(radius * phi.sin() * theta.cos());
                row_y.push(radius * phi.sin() * theta.sin());
                row_z.push(radius * phi.cos());
            }
            x.push(row_x);
            y.push(row_y);
            z.push(row_z);
        }

        Self { x, y, z }
    }
}
