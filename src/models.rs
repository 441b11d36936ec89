use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_IMPORT_LIMIT: u32 = 5000;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum CollectionType {
    Official,
    User,
}

/// Video categories as stored in the database and exposed over the API.
/// `Shorts` is decided by duration alone; the rest come from ordered
/// title-keyword rules (see `services::classifier`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum VideoCategory {
    Mv,
    Live,
    Interview,
    Shorts,
    Fancam,
    Behind,
    Vlog,
    Etc,
}

impl VideoCategory {
    /// Case-insensitive parse of a category code ("MV", "fancam", ...).
    pub fn parse(value: &str) -> Option<VideoCategory> {
        match value.to_uppercase().as_str() {
            "MV" => Some(VideoCategory::Mv),
            "LIVE" => Some(VideoCategory::Live),
            "INTERVIEW" => Some(VideoCategory::Interview),
            "SHORTS" => Some(VideoCategory::Shorts),
            "FANCAM" => Some(VideoCategory::Fancam),
            "BEHIND" => Some(VideoCategory::Behind),
            "VLOG" => Some(VideoCategory::Vlog),
            "ETC" => Some(VideoCategory::Etc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCategory::Mv => "MV",
            VideoCategory::Live => "LIVE",
            VideoCategory::Interview => "INTERVIEW",
            VideoCategory::Shorts => "SHORTS",
            VideoCategory::Fancam => "FANCAM",
            VideoCategory::Behind => "BEHIND",
            VideoCategory::Vlog => "VLOG",
            VideoCategory::Etc => "ETC",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Collection {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub collection_type: CollectionType,
    pub title: String,
    pub description: String,
    pub cover_image_url: Option<String>,
    pub profile_image_url: Option<String>,
    pub official_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: i64,
    pub collection_id: i64,
    pub youtube_video_id: String,
    pub title: String,
    pub channel_name: String,
    pub thumbnail_url: String,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub category: VideoCategory,
    pub duration_seconds: i64,
    pub published_at: DateTime<Utc>,
}

/// A parsed upload fetched from the uploads playlist, not yet deduplicated
/// or persisted. Lives only for the duration of one import call; the
/// category is attached when it is converted into a `videos` row.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateVideo {
    pub youtube_video_id: String,
    pub title: String,
    pub channel_name: String,
    pub thumbnail_url: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub duration_seconds: i64,
}

/// Channel metadata returned by the YouTube Data API. The import path only
/// consumes `uploads_playlist_id`; the rest backs the channel-info endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelInfo {
    pub title: String,
    pub thumbnail_url: String,
    pub video_count: i64,
    pub uploads_playlist_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CollectionCreateRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "type", default)]
    pub collection_type: Option<CollectionType>,
    pub cover_image_url: Option<String>,
    pub profile_image_url: Option<String>,
    pub official_link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    #[serde(flatten)]
    pub collection: Collection,
    pub video_count: i64,
}

fn default_import_limit() -> u32 {
    DEFAULT_IMPORT_LIMIT
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    #[serde(default = "default_import_limit")]
    pub limit: u32,
    /// Overrides the collection's official link as the import source.
    pub custom_channel_url: Option<String>,
    /// Category applied to the whole batch instead of per-video
    /// classification. Unknown values fall back to classification.
    pub default_category: Option<String>,
}

impl Default for ImportRequest {
    fn default() -> Self {
        ImportRequest {
            limit: DEFAULT_IMPORT_LIMIT,
            custom_channel_url: None,
            default_category: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported_count: u32,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    pub videos: Vec<Video>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub struct VideoParseRequest {
    pub url: String,
}

/// Metadata of a single video as returned by `POST /videos/parse`.
#[derive(Debug, Serialize)]
pub struct ParsedVideo {
    pub youtube_video_id: String,
    pub title: String,
    pub channel_name: String,
    pub thumbnail_url: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub duration_seconds: i64,
}
