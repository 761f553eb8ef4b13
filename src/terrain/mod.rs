//! Procedural baseline terrain generation

pub mod generator;
pub use generator::{TerrainGenerator, TerrainParams};
