use async_trait::async_trait;
use env_logger::Env;
use log::{info, warn};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use stickerforge::controller::Controller;
use stickerforge::error_handling::types::GenerationError;
use stickerforge::export;
use stickerforge::generation::ImageGenerator;
use stickerforge::sticker::prompt::SUGGESTIONS;
use stickerforge::sticker::{ImageData, StickerStyle};
use stickerforge::storage::{FileStorage, StickerStore};

// Smallest valid PNG: one transparent pixel.
const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Offline stand-in for the image service.
struct PixelGenerator;

#[async_trait]
impl ImageGenerator for PixelGenerator {
    async fn generate(&self, composed_prompt: &str) -> Result<ImageData, GenerationError> {
        info!("Would send {} chars to the image service", composed_prompt.len());
        Ok(ImageData::new("image/png", PIXEL_PNG))
    }
}

#[tokio::main]
async fn main() {
    // Initialize logger (RUST_LOG can override; default to info)
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();

    let out_dir: PathBuf = env::var("GALLERY_DEMO_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            env::current_dir()
                .expect("cwd")
                .join("target")
                .join("gallery_demo")
        });
    info!("Gallery demo writing to {}", out_dir.display());

    let storage = Arc::new(FileStorage::new(out_dir.join("data")).expect("create file storage"));
    let store = StickerStore::load(storage);
    let mut controller = Controller::new(
        store,
        Arc::new(PixelGenerator),
        Some(Duration::from_secs(5)),
    );

    // One sticker per style, cycling through the example prompts
    for (style, prompt) in StickerStyle::ALL.into_iter().zip(SUGGESTIONS.iter().cycle()) {
        match controller.submit(prompt, style).await {
            Some(status) => info!("{} / {} -> {}", style, prompt, status),
            None => warn!("Submission for {} was ignored", style),
        }
    }
    info!("Gallery now holds {} stickers", controller.stickers().len());

    let newest = controller
        .displayed_sticker()
        .cloned()
        .expect("last generation is displayed");
    let path = export::export_to_dir(&newest, &out_dir.join("exports")).expect("export sticker");
    info!("Exported {} to {}", newest.id, path.display());

    info!("{}", export::share_text(&newest));
    let link = export::share_link("http://127.0.0.1:8787/", &newest).expect("share link");
    info!("Share link: {}", link);
    let prefill = export::parse_share_link(&link).expect("parse share link");
    info!("Link reopens \"{}\" in {} style", prefill.prompt, prefill.style);

    // Deleting the displayed sticker clears the display
    let left = controller.delete(&newest.id).len();
    info!(
        "Deleted {}, {} left, session is {}",
        newest.id,
        left,
        controller.status()
    );
}
