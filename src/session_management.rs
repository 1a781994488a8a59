//! Generation session core module.
//!
//! This module provides the status type shown to the presentation layer and
//! the state machine tracking the most recent generation attempt.

use serde::{Deserialize, Serialize};

/// Submodule for the generation session state machine.
pub mod session;

pub use session::{GenerationSession, PendingGeneration, SessionState};

/// Represents the current status of the generation session.
///
/// Variants:
/// - `Idle`: nothing generated or displayed yet, or the displayed sticker was deleted.
/// - `Generating`: a request is in flight.
/// - `Success`: a sticker is displayed.
/// - `Error`: the last attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Idle,
    Generating,
    Success,
    Error,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Idle => "idle",
            GenerationStatus::Generating => "generating",
            GenerationStatus::Success => "success",
            GenerationStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
