//! Terrain sculpting: brush painting, stroke tracking, and decay
//!
//! The pieces compose into a [`session::SculptSession`]: the stroke
//! tracker turns pointer input into brush paints, the painter deforms the
//! height grid, and after a stroke ends the decay scheduler blends every
//! touched region back toward the baseline captured at session start.

pub mod config;
pub mod brush;
pub mod painter;
pub mod peak;
pub mod stroke;
pub mod decay;
pub mod baseline;
pub mod session;

pub use config::SculptConfig;
pub use brush::{Brush, BrushMode};
pub use peak::Peak;
pub use stroke::StrokeTracker;
pub use decay::DecayScheduler;
pub use baseline::BaselineManager;
pub use session::SculptSession;
