//! Scene-level state the engine reads but does not own

pub mod actors;
pub mod fx;

pub use actors::{Actor, ActorId, SceneActors};
pub use fx::{AnimationDriver, NullAnimation, NullVfx, VfxHandle, VfxSpawner};
