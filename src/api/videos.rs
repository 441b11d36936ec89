use crate::error::ApiError;
use crate::models::{ParsedVideo, VideoParseRequest};
use crate::utils::extract_youtube_video_id;
use crate::AppState;
use rocket::serde::json::Json;
use rocket::{post, State};

/// Parse a single video URL into its metadata without persisting anything.
#[post("/parse", data = "<request>")]
pub async fn parse_video(
    state: &State<AppState>,
    request: Json<VideoParseRequest>,
) -> Result<Json<ParsedVideo>, ApiError> {
    let video_id = extract_youtube_video_id(&request.url).ok_or(ApiError::InvalidVideoUrl)?;

    let details = state
        .youtube
        .get_video_details(vec![video_id])
        .await
        .map_err(|_| ApiError::VideoNotFound)?;

    let detail = details.into_iter().next().ok_or(ApiError::VideoNotFound)?;
    let published_at = detail.published_at.ok_or(ApiError::VideoNotFound)?;
    let duration_seconds = crate::utils::parse_iso8601_duration(&detail.duration);

    Ok(Json(ParsedVideo {
        youtube_video_id: detail.youtube_video_id,
        title: detail.title,
        channel_name: detail.channel_name,
        thumbnail_url: detail.thumbnail_url,
        description: detail.description,
        published_at,
        duration_seconds,
    }))
}
