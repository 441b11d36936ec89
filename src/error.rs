use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::{response, Response};
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;

/// Caller-visible failures. The import variants cover upfront resolution
/// and the final commit; an upstream failure mid-pagination is absent on
/// purpose, because the paginator degrades to partial results instead of
/// surfacing it (see `services::youtube::fetch_playlist_videos`).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Collection not found")]
    CollectionNotFound,
    #[error("No channel URL provided and no official link set for this collection")]
    NoChannelSource,
    #[error("Could not resolve YouTube channel ID from URL")]
    ChannelNotResolved,
    #[error("Could not find 'Uploads' playlist for this channel")]
    UploadsPlaylistNotFound,
    #[error("Could not fetch channel info")]
    ChannelInfoUnavailable,
    #[error("Invalid YouTube URL")]
    InvalidVideoUrl,
    #[error("Video not found on YouTube")]
    VideoNotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            ApiError::CollectionNotFound | ApiError::VideoNotFound => Status::NotFound,
            ApiError::NoChannelSource
            | ApiError::ChannelNotResolved
            | ApiError::UploadsPlaylistNotFound
            | ApiError::ChannelInfoUnavailable
            | ApiError::InvalidVideoUrl => Status::BadRequest,
            ApiError::Database(_) => Status::InternalServerError,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let body = ErrorResponse {
            error: status.reason_lossy().to_string(),
            message: self.to_string(),
        };
        let json = serde_json::to_string(&body).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
