//! Inspection protocol - JSON command/response definitions

use serde::{Deserialize, Serialize};

/// Commands accepted by the inspection server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum InspectCommand {
    /// Liveness check
    Ping,
    /// Get session state (active, painting, decay counts)
    GetSessionState,
    /// List registered surfaces
    ListSurfaces,
    /// Get a surface's extent and resolution
    GetSurfaceInfo { surface: u32 },
    /// Sample the terrain height at a world XZ position
    SampleHeight { surface: u32, x: f32, z: f32 },
    /// List active decays on a surface
    GetActiveDecays { surface: u32 },
    /// Override brush parameters; absent fields are left alone
    SetBrush {
        #[serde(skip_serializing_if = "Option::is_none")]
        radius: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        hardness: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        raise_strength: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        smooth_strength: Option<f32>,
    },
    /// Force-restore every captured baseline
    RestoreBaseline,
}

/// Response to an inspection command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InspectResponse {
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    Error {
        message: String,
    },
}

impl InspectResponse {
    /// Plain success with no payload
    pub fn ok() -> Self {
        Self::Ok { data: None }
    }

    /// Success with a JSON payload
    pub fn with_data(data: serde_json::Value) -> Self {
        Self::Ok { data: Some(data) }
    }

    /// Failure with a message
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
