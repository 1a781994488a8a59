use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::configuration::Config;
use crate::error_handling::types::{ControllerError, GenerationError};
use crate::generation::{GeminiClient, ImageGenerator};
use crate::session_management::{GenerationSession, GenerationStatus, PendingGeneration};
use crate::sticker::{compose, ImageData, StickerRecord, StickerStyle};
use crate::storage::{FileStorage, StickerStore, Storage};

/// Owns the sticker gallery, the generation session and the image generator.
///
/// Every state change goes through this type so that the gallery and the
/// session stay consistent: a generated sticker is stored and displayed in
/// one step, and deleting the displayed sticker clears the display.
pub struct Controller {
    store: StickerStore,
    session: GenerationSession,
    generator: Arc<dyn ImageGenerator>,
    request_timeout: Option<Duration>,
}

/// A generation accepted by the session, ready to run.
///
/// Holds everything the remote call needs, so callers that share the
/// controller can run it without holding their lock.
pub struct GenerationJob {
    pending: PendingGeneration,
    composed_prompt: String,
    generator: Arc<dyn ImageGenerator>,
    request_timeout: Option<Duration>,
}

/// A finished remote call, to hand back to [`Controller::finish`].
pub struct GenerationOutcome {
    pub pending: PendingGeneration,
    pub result: Result<ImageData, GenerationError>,
}

impl GenerationJob {
    pub fn pending(&self) -> &PendingGeneration {
        &self.pending
    }

    pub fn composed_prompt(&self) -> &str {
        &self.composed_prompt
    }

    /// Performs the remote call, racing it against the timeout if one is set.
    pub async fn run(self) -> GenerationOutcome {
        let call = self.generator.generate(&self.composed_prompt);
        let result = match self.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(GenerationError::Timeout(limit)),
            },
            None => call.await,
        };
        GenerationOutcome {
            pending: self.pending,
            result,
        }
    }
}

impl Controller {
    pub fn new(
        store: StickerStore,
        generator: Arc<dyn ImageGenerator>,
        request_timeout: Option<Duration>,
    ) -> Self {
        Self {
            store,
            session: GenerationSession::new(),
            generator,
            request_timeout,
        }
    }

    /// Opens the gallery under the configured data directory and builds the
    /// Gemini client from the configured credential.
    pub fn from_config(config: &Config) -> Result<Self, ControllerError> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.data_dir)?);
        let store = StickerStore::load(storage);
        let client = GeminiClient::new(config.api_key.clone(), &config.endpoint, &config.model);
        if !client.has_credential() {
            warn!("No API key configured; sticker generation will fail until one is set");
        }
        info!(
            "Controller ready: {} stickers in {}",
            store.len(),
            config.data_dir.display()
        );
        Ok(Self::new(store, Arc::new(client), config.request_timeout))
    }

    pub fn stickers(&self) -> &[StickerRecord] {
        self.store.stickers()
    }

    pub fn sticker(&self, id: &str) -> Option<&StickerRecord> {
        self.store.get(id)
    }

    pub fn status(&self) -> GenerationStatus {
        self.session.status()
    }

    pub fn displayed_sticker(&self) -> Option<&StickerRecord> {
        self.session.displayed_sticker()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.session.error_message()
    }

    /// Moves the session to `generating` and prepares the remote call.
    ///
    /// Returns `None` when the session guard ignores the submission.
    pub fn begin(&mut self, prompt: &str, style: StickerStyle) -> Option<GenerationJob> {
        let pending = self.session.submit(prompt, style)?;
        let composed_prompt = compose(&pending.prompt, pending.style);
        Some(GenerationJob {
            pending,
            composed_prompt,
            generator: self.generator.clone(),
            request_timeout: self.request_timeout,
        })
    }

    /// Applies a finished remote call: stores and displays the sticker, or
    /// records the failure message.
    pub fn finish(&mut self, outcome: GenerationOutcome) -> GenerationStatus {
        if !self.session.is_generating() {
            warn!(
                "Discarding outcome for \"{}\": session is {}",
                outcome.pending.prompt,
                self.session.status()
            );
            return self.session.status();
        }
        match outcome.result {
            Ok(image) => {
                let record =
                    StickerRecord::new(image, outcome.pending.prompt, outcome.pending.style);
                self.store.add(record.clone());
                self.session.succeed(record);
            }
            Err(e) => {
                error!("Sticker generation failed: {}", e);
                self.session.fail(e.to_string());
            }
        }
        self.session.status()
    }

    /// Runs a whole generation for callers that own the controller.
    ///
    /// Returns the resulting status, or `None` if the submission was ignored.
    pub async fn submit(&mut self, prompt: &str, style: StickerStyle) -> Option<GenerationStatus> {
        let job = self.begin(prompt, style)?;
        let outcome = job.run().await;
        Some(self.finish(outcome))
    }

    /// Displays a stored sticker. False if the id is unknown or a generation
    /// is in flight.
    pub fn select(&mut self, id: &str) -> bool {
        match self.store.get(id) {
            Some(record) => {
                let record = record.clone();
                self.session.select(record)
            }
            None => {
                warn!("Cannot select unknown sticker {}", id);
                false
            }
        }
    }

    /// Deletes a sticker from the gallery, clearing the display if it was shown.
    pub fn delete(&mut self, id: &str) -> &[StickerRecord] {
        self.store.remove(id);
        if self.session.sticker_deleted(id) {
            info!("Deleted the displayed sticker {}", id);
        }
        self.store.stickers()
    }
}
