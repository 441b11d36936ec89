use crate::db;
use crate::error::ApiError;
use crate::models::{ImportRequest, ImportResult, VideoCategory};
use crate::services::classifier;
use crate::services::youtube::{self, YouTubeApi};
use log::{info, warn};
use sqlx::SqlitePool;

/// Run the full channel-import pipeline for one collection: resolve the
/// channel, walk its uploads playlist, classify, dedup against the stored
/// videos and commit the survivors in a single transaction.
///
/// A remote failure mid-pagination shortens the batch instead of failing
/// the call; only upfront resolution failures and a failed commit surface
/// as errors.
pub async fn import_videos_from_channel(
    pool: &SqlitePool,
    api: &dyn YouTubeApi,
    collection_id: i64,
    request: &ImportRequest,
) -> Result<ImportResult, ApiError> {
    let collection = db::get_collection(pool, collection_id)
        .await?
        .ok_or(ApiError::CollectionNotFound)?;

    // An explicit source URL in the request takes priority over the
    // collection's official link.
    let channel_url = request
        .custom_channel_url
        .as_deref()
        .or(collection.official_link.as_deref())
        .ok_or(ApiError::NoChannelSource)?;

    let channel_id = youtube::resolve_channel_id(api, channel_url)
        .await
        .ok_or(ApiError::ChannelNotResolved)?;

    let playlist_id = match api.get_channel(&channel_id).await {
        Ok(Some(info)) => info.uploads_playlist_id,
        _ => return Err(ApiError::UploadsPlaylistNotFound),
    };

    info!(
        "Importing up to {} videos from playlist {playlist_id} into collection {collection_id}",
        request.limit
    );

    let candidates = youtube::fetch_playlist_videos(api, &playlist_id, request.limit).await;

    let forced_category = request.default_category.as_deref().and_then(|value| {
        let parsed = VideoCategory::parse(value);
        if parsed.is_none() {
            warn!("Unknown default category {value:?}, falling back to classification");
        }
        parsed
    });

    let mut tx = pool.begin().await?;
    let mut imported_count: u32 = 0;

    for candidate in &candidates {
        if db::video_exists(&mut tx, collection_id, &candidate.youtube_video_id).await? {
            continue;
        }

        let category = forced_category.unwrap_or_else(|| {
            classifier::classify(&candidate.title, candidate.duration_seconds)
        });

        db::insert_candidate(&mut tx, collection_id, candidate, category).await?;
        imported_count += 1;
    }

    tx.commit().await?;

    info!("Imported {imported_count} of {} fetched videos", candidates.len());

    Ok(ImportResult {
        imported_count,
        message: format!("Successfully imported {imported_count} videos."),
    })
}
