//! Animated 3D satellite orbit visualizer: TLE-driven SGP4 propagation,
//! animation-frame assembly, and a web UI that renders the result.

pub mod elements;
pub mod scene;
pub mod sim;
pub mod web;
