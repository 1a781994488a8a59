use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use log::info;
use warp::{Filter, Reply};

use super::routes::*;
use crate::controller::Controller;

/// Local HTTP API over the sticker gallery and the generation session
pub struct WebServer {
    controller: SharedController,
}

impl WebServer {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    pub fn controller(&self) -> SharedController {
        self.controller.clone()
    }

    /// Every route, with rejections rendered as JSON errors.
    pub fn routes(&self) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
        let controller = self.controller.clone();
        list_stickers_route(controller.clone())
            .or(delete_sticker_route(controller.clone()))
            .or(select_sticker_route(controller.clone()))
            .or(download_sticker_route(controller.clone()))
            .or(session_route(controller.clone()))
            .or(submit_route(controller))
            .or(styles_route())
            .recover(handle_rejection)
    }

    /// Serves the API on loopback until the process exits.
    pub async fn start(&self, port: u16) {
        let addr: SocketAddr = ([127, 0, 0, 1], port).into();
        info!("Serving the sticker API on http://{}", addr);
        warp::serve(self.routes()).run(addr).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::types::GenerationError;
    use crate::generation::ImageGenerator;
    use crate::session_management::GenerationStatus;
    use crate::sticker::{record::fixture, ImageData, StickerStyle};
    use crate::storage::{MemoryStorage, StickerStore};
    use crate::web_interface::types::SubmitRequest;
    use async_trait::async_trait;
    use std::time::Duration;
    use warp::http::StatusCode;

    struct Immediate(Result<ImageData, &'static str>);

    #[async_trait]
    impl ImageGenerator for Immediate {
        async fn generate(&self, _composed_prompt: &str) -> Result<ImageData, GenerationError> {
            self.0.clone().map_err(|m| GenerationError::InvalidResponse(m.to_string()))
        }
    }

    struct Stalled;

    #[async_trait]
    impl ImageGenerator for Stalled {
        async fn generate(&self, _composed_prompt: &str) -> Result<ImageData, GenerationError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(GenerationError::EmptyResult)
        }
    }

    fn server_with(generator: Arc<dyn ImageGenerator>) -> WebServer {
        let store = StickerStore::load(Arc::new(MemoryStorage::new()));
        WebServer::new(Controller::new(store, generator, None))
    }

    fn seeded(server: &WebServer, prompt: &str) -> String {
        let controller = server.controller();
        let mut guard = lock(&controller);
        let job = guard.begin(prompt, StickerStyle::Cartoon).unwrap();
        guard.finish(crate::controller::GenerationOutcome {
            pending: job.pending().clone(),
            result: Ok(fixture(prompt).image_data),
        });
        guard.stickers()[0].id.clone()
    }

    #[tokio::test]
    async fn test_submit_runs_in_background() {
        let server = server_with(Arc::new(Immediate(Ok(ImageData::from_bytes("image/png", b"X")))));
        let controller = server.controller();

        let handle = start_generation(&controller, "a cyberpunk cat", StickerStyle::Cartoon)
            .expect("accepted");
        assert_eq!(lock(&controller).status(), GenerationStatus::Generating);
        handle.await.unwrap();

        let guard = lock(&controller);
        assert_eq!(guard.status(), GenerationStatus::Success);
        assert_eq!(guard.stickers().len(), 1);
        assert_eq!(guard.displayed_sticker().unwrap().prompt, "a cyberpunk cat");
    }

    #[tokio::test]
    async fn test_submit_reports_failure_message() {
        let server = server_with(Arc::new(Immediate(Err("garbled"))));
        let controller = server.controller();
        start_generation(&controller, "owl", StickerStyle::Vintage)
            .unwrap()
            .await
            .unwrap();
        let guard = lock(&controller);
        assert_eq!(guard.status(), GenerationStatus::Error);
        assert!(guard.error_message().unwrap().contains("garbled"));
    }

    #[tokio::test]
    async fn test_submit_status_codes() {
        let server = server_with(Arc::new(Stalled));
        let controller = server.controller();

        let res = submit_generation(
            &controller,
            SubmitRequest {
                prompt: "  ".to_string(),
                style: StickerStyle::Cartoon,
            },
        );
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(lock(&controller).status(), GenerationStatus::Idle);

        let res = submit_generation(
            &controller,
            SubmitRequest {
                prompt: "slow one".to_string(),
                style: StickerStyle::Kawaii,
            },
        );
        assert_eq!(res.status(), StatusCode::ACCEPTED);

        let res = submit_generation(
            &controller,
            SubmitRequest {
                prompt: "second".to_string(),
                style: StickerStyle::Kawaii,
            },
        );
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(lock(&controller).status(), GenerationStatus::Generating);
    }

    #[tokio::test]
    async fn test_sticker_routes() {
        let server = server_with(Arc::new(Stalled));
        let controller = server.controller();
        let first = seeded(&server, "first");
        let second = seeded(&server, "second");

        assert_eq!(list_stickers(&controller).status(), StatusCode::OK);
        assert_eq!(select_sticker(&controller, &first).status(), StatusCode::OK);
        assert_eq!(lock(&controller).displayed_sticker().unwrap().id, first);
        assert_eq!(
            select_sticker(&controller, "nope").status(),
            StatusCode::NOT_FOUND
        );

        let res = download_sticker(&controller, &second);
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["content-type"], "image/png");
        let disposition = res.headers()["content-disposition"].to_str().unwrap();
        assert_eq!(
            disposition,
            format!("attachment; filename=\"stickr-{}.png\"", second)
        );
        assert_eq!(
            download_sticker(&controller, "nope").status(),
            StatusCode::NOT_FOUND
        );

        assert_eq!(delete_sticker(&controller, &first).status(), StatusCode::OK);
        let guard = lock(&controller);
        assert_eq!(guard.stickers().len(), 1);
        assert_eq!(guard.status(), GenerationStatus::Idle);
    }

    #[tokio::test]
    async fn test_select_conflicts_while_generating() {
        let server = server_with(Arc::new(Stalled));
        let controller = server.controller();
        let id = seeded(&server, "stored");
        start_generation(&controller, "busy", StickerStyle::Cartoon).unwrap();
        assert_eq!(select_sticker(&controller, &id).status(), StatusCode::CONFLICT);
        assert_eq!(session_snapshot(&controller).status(), StatusCode::OK);
        assert_eq!(list_styles().status(), StatusCode::OK);
    }
}
