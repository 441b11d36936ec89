use crate::db;
use crate::error::ApiError;
use crate::models::{
    ChannelInfo, Collection, CollectionCreateRequest, CollectionResponse, ImportRequest,
    ImportResult, VideoCategory, VideoListResponse, DEFAULT_PAGE_SIZE,
};
use crate::services::{import_service, youtube};
use crate::AppState;
use log::info;
use rocket::serde::json::Json;
use rocket::{get, post, State};

#[post("/", data = "<request>")]
pub async fn create_collection(
    state: &State<AppState>,
    request: Json<CollectionCreateRequest>,
) -> Result<Json<Collection>, ApiError> {
    let collection = db::create_collection(&state.db, &request).await?;
    info!("Created collection {} ({})", collection.id, collection.title);
    Ok(Json(collection))
}

#[get("/")]
pub async fn list_collections(
    state: &State<AppState>,
) -> Result<Json<Vec<CollectionResponse>>, ApiError> {
    let collections = db::list_collections(&state.db).await?;

    let mut responses = Vec::with_capacity(collections.len());
    for collection in collections {
        let video_count = db::count_collection_videos(&state.db, collection.id).await?;
        responses.push(CollectionResponse {
            collection,
            video_count,
        });
    }

    Ok(Json(responses))
}

#[get("/<id>")]
pub async fn get_collection(
    state: &State<AppState>,
    id: i64,
) -> Result<Json<CollectionResponse>, ApiError> {
    let collection = db::get_collection(&state.db, id)
        .await?
        .ok_or(ApiError::CollectionNotFound)?;
    let video_count = db::count_collection_videos(&state.db, id).await?;

    Ok(Json(CollectionResponse {
        collection,
        video_count,
    }))
}

#[get("/<id>/videos?<skip>&<limit>&<category>")]
pub async fn get_collection_videos(
    state: &State<AppState>,
    id: i64,
    skip: Option<i64>,
    limit: Option<i64>,
    category: Option<String>,
) -> Result<Json<VideoListResponse>, ApiError> {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    // "ALL" (or an unknown code) means no category filter.
    let category = category
        .as_deref()
        .filter(|value| !value.eq_ignore_ascii_case("ALL"))
        .and_then(VideoCategory::parse);

    let (videos, total) = db::list_collection_videos(&state.db, id, skip, limit, category).await?;
    let has_more = skip + (videos.len() as i64) < total;

    Ok(Json(VideoListResponse {
        videos,
        total,
        skip,
        limit,
        has_more,
    }))
}

#[get("/<id>/channel-info")]
pub async fn get_collection_channel_info(
    state: &State<AppState>,
    id: i64,
) -> Result<Json<ChannelInfo>, ApiError> {
    let collection = db::get_collection(&state.db, id)
        .await?
        .ok_or(ApiError::CollectionNotFound)?;

    let channel_url = collection
        .official_link
        .as_deref()
        .ok_or(ApiError::NoChannelSource)?;

    let channel_id = youtube::resolve_channel_id(state.youtube.as_ref(), channel_url)
        .await
        .ok_or(ApiError::ChannelNotResolved)?;

    match state.youtube.get_channel(&channel_id).await {
        Ok(Some(info)) => Ok(Json(info)),
        _ => Err(ApiError::ChannelInfoUnavailable),
    }
}

#[post("/<id>/import", data = "<payload>")]
pub async fn import_videos(
    state: &State<AppState>,
    id: i64,
    payload: Option<Json<ImportRequest>>,
) -> Result<Json<ImportResult>, ApiError> {
    let request = payload.map(|json| json.into_inner()).unwrap_or_default();

    let result =
        import_service::import_videos_from_channel(&state.db, state.youtube.as_ref(), id, &request)
            .await?;

    Ok(Json(result))
}
