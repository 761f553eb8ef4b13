//! Height-field storage and surface registry

pub mod surface;
pub mod height_field;
pub mod store;

pub use surface::{SurfaceId, SurfaceExtent};
pub use height_field::{HeightField, HeightWindow};
pub use store::{TerrainStore, RayHit};
