use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{error, info};
use tokio::task::JoinHandle;
use warp::{http::StatusCode, reply, Filter, Rejection, Reply};

use super::types::{ApiError, SessionResponse, StyleResponse, SubmitRequest};
use crate::controller::Controller;
use crate::export::download_file_name;
use crate::sticker::StickerStyle;

/// Controller shared between request handlers and generation tasks.
pub type SharedController = Arc<Mutex<Controller>>;

// A panic in one handler must not take the whole API down with it.
pub(crate) fn lock(controller: &SharedController) -> MutexGuard<'_, Controller> {
    controller.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_controller(
    controller: SharedController,
) -> impl Filter<Extract = (SharedController,), Error = Infallible> + Clone {
    warp::any().map(move || controller.clone())
}

fn api_error(status: StatusCode, message: impl Into<String>) -> reply::Response {
    reply::with_status(reply::json(&ApiError::new(message)), status).into_response()
}

fn session_reply(controller: &Controller, status: StatusCode) -> reply::Response {
    reply::with_status(
        reply::json(&SessionResponse::from_controller(controller)),
        status,
    )
    .into_response()
}

pub(crate) fn list_stickers(controller: &SharedController) -> reply::Response {
    reply::json(&lock(controller).stickers()).into_response()
}

pub(crate) fn delete_sticker(controller: &SharedController, id: &str) -> reply::Response {
    let mut guard = lock(controller);
    reply::json(&guard.delete(id)).into_response()
}

pub(crate) fn select_sticker(controller: &SharedController, id: &str) -> reply::Response {
    let mut guard = lock(controller);
    if guard.sticker(id).is_none() {
        return api_error(StatusCode::NOT_FOUND, format!("Sticker {} not found", id));
    }
    if !guard.select(id) {
        return api_error(
            StatusCode::CONFLICT,
            "A sticker is being generated, try again when it finishes",
        );
    }
    session_reply(&guard, StatusCode::OK)
}

pub(crate) fn download_sticker(controller: &SharedController, id: &str) -> reply::Response {
    let record = match lock(controller).sticker(id) {
        Some(record) => record.clone(),
        None => return api_error(StatusCode::NOT_FOUND, format!("Sticker {} not found", id)),
    };
    match record.image_data.decode() {
        Ok(bytes) => {
            let disposition = format!("attachment; filename=\"{}\"", download_file_name(&record));
            let res = reply::with_header(bytes, "Content-Type", record.image_data.mime_type.clone());
            reply::with_header(res, "Content-Disposition", disposition).into_response()
        }
        Err(e) => {
            error!("Stored image for {} is corrupt: {}", id, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Stored image is corrupt")
        }
    }
}

pub(crate) fn session_snapshot(controller: &SharedController) -> reply::Response {
    session_reply(&lock(controller), StatusCode::OK)
}

/// Starts a generation in the background.
///
/// The session moves to `generating` before this returns; the remote call
/// runs on a spawned task that takes the lock again only to apply the result.
/// Returns `None` when the session ignores the submission.
pub(crate) fn start_generation(
    controller: &SharedController,
    prompt: &str,
    style: StickerStyle,
) -> Option<JoinHandle<()>> {
    let job = lock(controller).begin(prompt, style)?;
    let shared = controller.clone();
    Some(tokio::spawn(async move {
        let outcome = job.run().await;
        let status = lock(&shared).finish(outcome);
        info!("Background generation finished: {}", status);
    }))
}

pub(crate) fn submit_generation(
    controller: &SharedController,
    request: SubmitRequest,
) -> reply::Response {
    match start_generation(controller, &request.prompt, request.style) {
        Some(_) => session_reply(&lock(controller), StatusCode::ACCEPTED),
        None if request.prompt.trim().is_empty() => {
            api_error(StatusCode::BAD_REQUEST, "Prompt is empty")
        }
        None => api_error(StatusCode::CONFLICT, "A sticker is already being generated"),
    }
}

pub(crate) fn list_styles() -> reply::Response {
    let styles: Vec<StyleResponse> = StickerStyle::ALL.into_iter().map(Into::into).collect();
    reply::json(&styles).into_response()
}

/// GET /stickers
pub fn list_stickers_route(
    controller: SharedController,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("stickers")
        .and(warp::get())
        .and(with_controller(controller))
        .map(|controller: SharedController| list_stickers(&controller))
}

/// DELETE /stickers/:id
pub fn delete_sticker_route(
    controller: SharedController,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("stickers" / String)
        .and(warp::delete())
        .and(with_controller(controller))
        .map(|id: String, controller: SharedController| delete_sticker(&controller, &id))
}

/// POST /stickers/:id/select
pub fn select_sticker_route(
    controller: SharedController,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("stickers" / String / "select")
        .and(warp::post())
        .and(with_controller(controller))
        .map(|id: String, controller: SharedController| select_sticker(&controller, &id))
}

/// GET /stickers/:id/download
pub fn download_sticker_route(
    controller: SharedController,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("stickers" / String / "download")
        .and(warp::get())
        .and(with_controller(controller))
        .map(|id: String, controller: SharedController| download_sticker(&controller, &id))
}

/// GET /session
pub fn session_route(
    controller: SharedController,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("session")
        .and(warp::get())
        .and(with_controller(controller))
        .map(|controller: SharedController| session_snapshot(&controller))
}

/// POST /session/submit
pub fn submit_route(
    controller: SharedController,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("session" / "submit")
        .and(warp::post())
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with_controller(controller))
        .map(|request: SubmitRequest, controller: SharedController| {
            submit_generation(&controller, request)
        })
}

/// GET /styles
pub fn styles_route() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("styles").and(warp::get()).map(list_styles)
}

/// Turns warp rejections into the JSON error body.
pub async fn handle_rejection(err: Rejection) -> Result<reply::Response, Infallible> {
    let res = if err.is_not_found() {
        api_error(StatusCode::NOT_FOUND, "Not found")
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        api_error(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        api_error(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        api_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        error!("Unhandled rejection: {:?}", err);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };
    Ok(res)
}
