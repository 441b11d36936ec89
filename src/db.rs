use crate::models::{CandidateVideo, Collection, CollectionType, Video, VideoCategory};
use crate::models::{CollectionCreateRequest, MAX_DESCRIPTION_LENGTH};
use chrono::Utc;
use log::info;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Create the tables if they are missing. Safe to run on every startup.
///
/// The UNIQUE(collection_id, youtube_video_id) constraint is what keeps two
/// concurrent imports of the same channel from storing a video twice: the
/// pipeline itself takes no lock, so the second batch fails and rolls back.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Initializing database schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS collections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT NOT NULL DEFAULT 'USER',
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            cover_image_url TEXT,
            profile_image_url TEXT,
            official_link TEXT,
            created_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS videos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            collection_id INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
            youtube_video_id TEXT NOT NULL,
            title TEXT NOT NULL,
            channel_name TEXT NOT NULL,
            thumbnail_url TEXT NOT NULL,
            description TEXT,
            comment TEXT,
            category TEXT NOT NULL DEFAULT 'ETC',
            duration_seconds INTEGER NOT NULL DEFAULT 0,
            published_at DATETIME NOT NULL,
            UNIQUE(collection_id, youtube_video_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_collection(
    pool: &SqlitePool,
    request: &CollectionCreateRequest,
) -> Result<Collection, sqlx::Error> {
    let collection_type = request.collection_type.unwrap_or(CollectionType::User);

    sqlx::query_as::<_, Collection>(
        r#"
        INSERT INTO collections
            (type, title, description, cover_image_url, profile_image_url, official_link, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(collection_type)
    .bind(&request.title)
    .bind(&request.description)
    .bind(&request.cover_image_url)
    .bind(&request.profile_image_url)
    .bind(&request.official_link)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn get_collection(
    pool: &SqlitePool,
    collection_id: i64,
) -> Result<Option<Collection>, sqlx::Error> {
    sqlx::query_as::<_, Collection>("SELECT * FROM collections WHERE id = ?")
        .bind(collection_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_collections(pool: &SqlitePool) -> Result<Vec<Collection>, sqlx::Error> {
    sqlx::query_as::<_, Collection>("SELECT * FROM collections ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn count_collection_videos(
    pool: &SqlitePool,
    collection_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE collection_id = ?")
        .bind(collection_id)
        .fetch_one(pool)
        .await
}

/// Paged listing of a collection's videos, newest first, optionally
/// filtered to one category.
pub async fn list_collection_videos(
    pool: &SqlitePool,
    collection_id: i64,
    skip: i64,
    limit: i64,
    category: Option<VideoCategory>,
) -> Result<(Vec<Video>, i64), sqlx::Error> {
    let (videos, total) = match category {
        Some(category) => {
            let videos = sqlx::query_as::<_, Video>(
                r#"
                SELECT * FROM videos
                WHERE collection_id = ? AND category = ?
                ORDER BY published_at DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(collection_id)
            .bind(category)
            .bind(limit)
            .bind(skip)
            .fetch_all(pool)
            .await?;

            let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM videos WHERE collection_id = ? AND category = ?",
            )
            .bind(collection_id)
            .bind(category)
            .fetch_one(pool)
            .await?;

            (videos, total)
        }
        None => {
            let videos = sqlx::query_as::<_, Video>(
                r#"
                SELECT * FROM videos
                WHERE collection_id = ?
                ORDER BY published_at DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(collection_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(pool)
            .await?;

            let total = count_collection_videos(pool, collection_id).await?;

            (videos, total)
        }
    };

    Ok((videos, total))
}

/// Existence probe for the dedup step, scoped to the caller's transaction.
pub async fn video_exists(
    tx: &mut Transaction<'_, Sqlite>,
    collection_id: i64,
    youtube_video_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM videos WHERE collection_id = ? AND youtube_video_id = ?)",
    )
    .bind(collection_id)
    .bind(youtube_video_id)
    .fetch_one(&mut **tx)
    .await
}

/// Insert one imported candidate inside the caller's transaction. The
/// description is truncated by characters, not bytes, to stay valid UTF-8.
pub async fn insert_candidate(
    tx: &mut Transaction<'_, Sqlite>,
    collection_id: i64,
    candidate: &CandidateVideo,
    category: VideoCategory,
) -> Result<(), sqlx::Error> {
    let description: String = candidate
        .description
        .chars()
        .take(MAX_DESCRIPTION_LENGTH)
        .collect();

    sqlx::query(
        r#"
        INSERT INTO videos
            (collection_id, youtube_video_id, title, channel_name, thumbnail_url,
             description, category, duration_seconds, published_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(collection_id)
    .bind(&candidate.youtube_video_id)
    .bind(&candidate.title)
    .bind(&candidate.channel_name)
    .bind(&candidate.thumbnail_url)
    .bind(&description)
    .bind(category)
    .bind(candidate.duration_seconds)
    .bind(candidate.published_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
