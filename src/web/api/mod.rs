pub mod elements;
pub mod error;
pub mod satellites;
pub mod simulation;
