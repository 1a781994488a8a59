use log::{debug, info, warn};

use crate::session_management::GenerationStatus;
use crate::sticker::{StickerRecord, StickerStyle};

/// Prompt and style of the request currently in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGeneration {
    pub prompt: String,
    pub style: StickerStyle,
}

/// State of the most recent generation attempt.
///
/// Only `Success` carries a sticker and only `Error` carries a message, so
/// the two can never be set together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Generating(PendingGeneration),
    Success { sticker: StickerRecord },
    Error { message: String },
}

/// Lifecycle of generation requests for one running process.
///
/// Never persisted; starts `Idle` and cycles for the life of the process.
#[derive(Debug)]
pub struct GenerationSession {
    state: SessionState,
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> GenerationStatus {
        match self.state {
            SessionState::Idle => GenerationStatus::Idle,
            SessionState::Generating(_) => GenerationStatus::Generating,
            SessionState::Success { .. } => GenerationStatus::Success,
            SessionState::Error { .. } => GenerationStatus::Error,
        }
    }

    pub fn displayed_sticker(&self) -> Option<&StickerRecord> {
        match &self.state {
            SessionState::Success { sticker } => Some(sticker),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, SessionState::Generating(_))
    }

    /// Starts a generation.
    ///
    /// Returns `None`, leaving the state untouched, when the prompt is blank
    /// or another generation is still in flight.
    pub fn submit(&mut self, prompt: &str, style: StickerStyle) -> Option<PendingGeneration> {
        if prompt.trim().is_empty() {
            debug!("Ignoring submit with an empty prompt");
            return None;
        }
        if let SessionState::Generating(pending) = &self.state {
            warn!(
                "Ignoring submit while \"{}\" is still generating",
                pending.prompt
            );
            return None;
        }
        let pending = PendingGeneration {
            prompt: prompt.to_string(),
            style,
        };
        info!("Generating {} sticker for \"{}\"", style, prompt);
        self.state = SessionState::Generating(pending.clone());
        Some(pending)
    }

    /// `Generating -> Success`. Returns false if nothing was in flight.
    pub fn succeed(&mut self, sticker: StickerRecord) -> bool {
        if !self.is_generating() {
            warn!("Dropping result for sticker {}: no generation in flight", sticker.id);
            return false;
        }
        info!("Sticker {} generated", sticker.id);
        self.state = SessionState::Success { sticker };
        true
    }

    /// `Generating -> Error`. Returns false if nothing was in flight.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        if !self.is_generating() {
            warn!("Dropping failure \"{}\": no generation in flight", message);
            return false;
        }
        warn!("Sticker generation failed: {}", message);
        self.state = SessionState::Error { message };
        true
    }

    /// Displays a stored sticker. Ignored while generating.
    pub fn select(&mut self, sticker: StickerRecord) -> bool {
        if self.is_generating() {
            debug!("Ignoring select of {} while generating", sticker.id);
            return false;
        }
        self.state = SessionState::Success { sticker };
        true
    }

    /// Reacts to a sticker being deleted from the gallery.
    ///
    /// Returns true if it was the displayed one, which resets the session to `Idle`.
    pub fn sticker_deleted(&mut self, id: &str) -> bool {
        match &self.state {
            SessionState::Success { sticker } if sticker.id == id => {
                self.state = SessionState::Idle;
                true
            }
            _ => false,
        }
    }
}
