use crate::config::{YOUTUBE_API_KEY, YOUTUBE_HTTP_TIMEOUT_SECS};
use crate::models::{CandidateVideo, ChannelInfo};
use crate::utils::parse_iso8601_duration;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use log::{error, warn};
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// The Data API caps playlistItems pages and videos-detail batches at 50.
pub const MAX_RESULTS_PER_PAGE: u32 = 50;

/// One page of the uploads playlist: the video IDs it listed (entries
/// without an ID already dropped) and the continuation token, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistPage {
    pub video_ids: Vec<String>,
    pub next_page_token: Option<String>,
}

/// Detail record for a single video as returned by the videos endpoint.
/// `published_at` is `None` when the payload was missing or malformed;
/// the paginator drops such items.
#[derive(Debug, Clone)]
pub struct VideoDetails {
    pub youtube_video_id: String,
    pub title: String,
    pub channel_name: String,
    pub thumbnail_url: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
    pub duration: String,
}

/// Remote platform boundary. The import pipeline only talks to YouTube
/// through this trait so tests can drive it with a scripted source.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait YouTubeApi: Send + Sync {
    /// Translate a handle ("@name" without the @) into a channel ID.
    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>>;

    /// Fetch channel metadata, including the uploads playlist ID.
    async fn get_channel(&self, channel_id: &str) -> Result<Option<ChannelInfo>>;

    /// Fetch one page of playlist item IDs.
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_size: u32,
        page_token: Option<String>,
    ) -> Result<PlaylistPage>;

    /// Fetch full details for up to 50 video IDs in one call.
    async fn get_video_details(&self, video_ids: Vec<String>) -> Result<Vec<VideoDetails>>;
}

lazy_static! {
    static ref HANDLE_URL: Regex =
        Regex::new(r"youtube\.com/@([A-Za-z0-9_.-]+)").expect("invalid handle regex");
    static ref CHANNEL_ID_URL: Regex =
        Regex::new(r"youtube\.com/channel/([A-Za-z0-9_-]+)").expect("invalid channel regex");
}

/// Resolve a channel URL (handle or direct channel-id form) to a channel ID.
/// The handle form costs one remote lookup; the channel-id form is pure
/// extraction. No retries.
pub async fn resolve_channel_id(api: &dyn YouTubeApi, url: &str) -> Option<String> {
    if let Some(captures) = HANDLE_URL.captures(url) {
        let handle = &captures[1];
        match api.resolve_handle(handle).await {
            Ok(Some(channel_id)) => return Some(channel_id),
            Ok(None) => warn!("No channel found for handle @{handle}"),
            Err(e) => warn!("Handle lookup failed for @{handle}: {e:?}"),
        }
    }

    CHANNEL_ID_URL
        .captures(url)
        .map(|captures| captures[1].to_string())
}

/// Walk the uploads playlist page by page, batching detail lookups, until
/// `limit` candidates are gathered or the playlist runs out.
///
/// A failed page or detail call ends the walk and returns whatever has
/// accumulated so far. This best-effort stop is inherited behavior, kept
/// as-is pending confirmation; it is deliberately not a retry loop and not
/// fail-fast.
pub async fn fetch_playlist_videos(
    api: &dyn YouTubeApi,
    playlist_id: &str,
    limit: u32,
) -> Vec<CandidateVideo> {
    let mut videos: Vec<CandidateVideo> = Vec::new();
    let mut next_page_token: Option<String> = None;

    while (videos.len() as u32) < limit {
        let page_size = (limit - videos.len() as u32).min(MAX_RESULTS_PER_PAGE);

        let page = match api
            .list_playlist_items(playlist_id, page_size, next_page_token.clone())
            .await
        {
            Ok(page) => page,
            Err(e) => {
                error!("Error fetching playlist items: {e:?}");
                break;
            }
        };
        next_page_token = page.next_page_token;

        if page.video_ids.is_empty() {
            break;
        }

        let details = match api.get_video_details(page.video_ids).await {
            Ok(details) => details,
            Err(e) => {
                error!("Error fetching video details: {e:?}");
                break;
            }
        };

        for item in details {
            if item.title == "Private video" || item.title == "Deleted video" {
                continue;
            }
            let published_at = match item.published_at {
                Some(ts) => ts,
                None => {
                    warn!(
                        "Skipping video {} with missing publish date",
                        item.youtube_video_id
                    );
                    continue;
                }
            };

            videos.push(CandidateVideo {
                youtube_video_id: item.youtube_video_id,
                title: item.title,
                channel_name: item.channel_name,
                thumbnail_url: item.thumbnail_url,
                description: item.description,
                published_at,
                duration_seconds: parse_iso8601_duration(&item.duration),
            });
        }

        if next_page_token.is_none() {
            break;
        }
    }

    videos
}

/// YouTube Data API v3 client.
pub struct YouTubeDataApi {
    client: Client,
    api_key: String,
}

impl Default for YouTubeDataApi {
    fn default() -> Self {
        Self::new()
    }
}

impl YouTubeDataApi {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(*YOUTUBE_HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        YouTubeDataApi {
            client,
            api_key: YOUTUBE_API_KEY.clone(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("YouTube API returned status {}", response.status());
        }
        Ok(response.json::<Value>().await?)
    }
}

fn pick_thumbnail(thumbnails: &Value) -> String {
    for size in ["maxres", "high", "default"] {
        if let Some(url) = thumbnails[size]["url"].as_str() {
            return url.to_string();
        }
    }
    String::new()
}

fn parse_published_at(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[async_trait]
impl YouTubeApi for YouTubeDataApi {
    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>> {
        // https://developers.google.com/youtube/v3/docs/channels
        let url = format!(
            "{YOUTUBE_API_BASE_URL}/channels?part=id&forHandle=@{}&key={}",
            handle, self.api_key
        );
        let response = self.get_json(&url).await?;

        Ok(response["items"][0]["id"].as_str().map(String::from))
    }

    async fn get_channel(&self, channel_id: &str) -> Result<Option<ChannelInfo>> {
        let url = format!(
            "{YOUTUBE_API_BASE_URL}/channels?part=snippet,contentDetails,statistics&id={}&key={}",
            channel_id, self.api_key
        );
        let response = self.get_json(&url).await?;
        let item = &response["items"][0];

        let title = item["snippet"]["title"].as_str();
        let uploads = item["contentDetails"]["relatedPlaylists"]["uploads"].as_str();
        let (title, uploads_playlist_id) = match (title, uploads) {
            (Some(title), Some(uploads)) => (title.to_string(), uploads.to_string()),
            _ => return Ok(None),
        };

        Ok(Some(ChannelInfo {
            title,
            thumbnail_url: item["snippet"]["thumbnails"]["default"]["url"]
                .as_str()
                .unwrap_or("")
                .to_string(),
            video_count: item["statistics"]["videoCount"]
                .as_str()
                .and_then(|count| count.parse().ok())
                .unwrap_or(0),
            uploads_playlist_id,
        }))
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_size: u32,
        page_token: Option<String>,
    ) -> Result<PlaylistPage> {
        // https://developers.google.com/youtube/v3/docs/playlistItems
        let mut url = format!(
            "{YOUTUBE_API_BASE_URL}/playlistItems?part=snippet,contentDetails&playlistId={}&maxResults={}&key={}",
            playlist_id, page_size, self.api_key
        );
        if let Some(token) = &page_token {
            url.push_str(&format!("&pageToken={token}"));
        }
        let response = self.get_json(&url).await?;

        let video_ids = response["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    // contentDetails.videoId is the reliable ID field here
                    .filter_map(|item| item["contentDetails"]["videoId"].as_str())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(PlaylistPage {
            video_ids,
            next_page_token: response["nextPageToken"].as_str().map(String::from),
        })
    }

    async fn get_video_details(&self, video_ids: Vec<String>) -> Result<Vec<VideoDetails>> {
        let url = format!(
            "{YOUTUBE_API_BASE_URL}/videos?part=snippet,contentDetails&id={}&key={}",
            video_ids.join(","),
            self.api_key
        );
        let response = self.get_json(&url).await?;

        let mut details = Vec::new();
        if let Some(items) = response["items"].as_array() {
            for item in items {
                let youtube_video_id = match item["id"].as_str() {
                    Some(id) => id.to_string(),
                    None => continue,
                };
                let title = match item["snippet"]["title"].as_str() {
                    Some(title) => title.to_string(),
                    None => {
                        warn!("Skipping video {youtube_video_id} without a title");
                        continue;
                    }
                };

                details.push(VideoDetails {
                    youtube_video_id,
                    title,
                    channel_name: item["snippet"]["channelTitle"]
                        .as_str()
                        .unwrap_or("")
                        .to_string(),
                    thumbnail_url: pick_thumbnail(&item["snippet"]["thumbnails"]),
                    description: item["snippet"]["description"]
                        .as_str()
                        .unwrap_or("")
                        .to_string(),
                    published_at: parse_published_at(&item["snippet"]["publishedAt"]),
                    duration: item["contentDetails"]["duration"]
                        .as_str()
                        .unwrap_or("PT0S")
                        .to_string(),
                });
            }
        }

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn detail(id: &str, title: &str, duration: &str) -> VideoDetails {
        VideoDetails {
            youtube_video_id: id.to_string(),
            title: title.to_string(),
            channel_name: "Channel".to_string(),
            thumbnail_url: "https://i.ytimg.com/vi/x/hqdefault.jpg".to_string(),
            description: "desc".to_string(),
            published_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            duration: duration.to_string(),
        }
    }

    #[tokio::test]
    async fn resolves_channel_id_urls_without_network() {
        let api = MockYouTubeApi::new();
        let resolved = resolve_channel_id(
            &api,
            "https://www.youtube.com/channel/UCTeLqJq1mXUX5WWoNXLmOIA",
        )
        .await;
        assert_eq!(resolved, Some("UCTeLqJq1mXUX5WWoNXLmOIA".to_string()));
    }

    #[tokio::test]
    async fn resolves_handle_urls_via_lookup() {
        let mut api = MockYouTubeApi::new();
        api.expect_resolve_handle()
            .withf(|handle| handle == "somegroup")
            .times(1)
            .returning(|_| Ok(Some("UC123".to_string())));

        let resolved = resolve_channel_id(&api, "https://youtube.com/@somegroup").await;
        assert_eq!(resolved, Some("UC123".to_string()));
    }

    #[tokio::test]
    async fn unresolvable_handle_yields_none() {
        let mut api = MockYouTubeApi::new();
        api.expect_resolve_handle().returning(|_| Ok(None));

        let resolved = resolve_channel_id(&api, "https://youtube.com/@ghost").await;
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn unrecognized_urls_yield_none() {
        let api = MockYouTubeApi::new();
        assert_eq!(resolve_channel_id(&api, "https://example.com/watch").await, None);
    }

    #[tokio::test]
    async fn limit_of_30_makes_a_single_30_item_page_request() {
        let mut api = MockYouTubeApi::new();
        api.expect_list_playlist_items()
            .withf(|_, page_size, token| *page_size == 30 && token.is_none())
            .times(1)
            .returning(|_, page_size, _| {
                Ok(PlaylistPage {
                    video_ids: (0..page_size).map(|i| format!("vid{i}")).collect(),
                    next_page_token: Some("page2".to_string()),
                })
            });
        api.expect_get_video_details().times(1).returning(|ids| {
            Ok(ids
                .iter()
                .map(|id| detail(id, &format!("Title {id}"), "PT3M"))
                .collect())
        });

        let videos = fetch_playlist_videos(&api, "PL_up", 30).await;
        assert_eq!(videos.len(), 30);
    }

    #[tokio::test]
    async fn walks_pages_until_limit() {
        let mut api = MockYouTubeApi::new();
        api.expect_list_playlist_items()
            .times(3)
            .returning(|_, page_size, token| {
                let start = match token.as_deref() {
                    None => 0,
                    Some("t50") => 50,
                    Some("t100") => 100,
                    other => panic!("unexpected token {other:?}"),
                };
                Ok(PlaylistPage {
                    video_ids: (start..start + page_size).map(|i| format!("vid{i}")).collect(),
                    next_page_token: Some(format!("t{}", start + page_size)),
                })
            });
        api.expect_get_video_details().times(3).returning(|ids| {
            Ok(ids.iter().map(|id| detail(id, id, "PT2M")).collect())
        });

        let videos = fetch_playlist_videos(&api, "PL_up", 120).await;
        assert_eq!(videos.len(), 120);
        assert_eq!(videos[0].youtube_video_id, "vid0");
        assert_eq!(videos[119].youtube_video_id, "vid119");
    }

    #[tokio::test]
    async fn page_failure_returns_partial_results() {
        let mut api = MockYouTubeApi::new();
        api.expect_list_playlist_items()
            .times(2)
            .returning(|_, _, token| {
                if token.is_none() {
                    Ok(PlaylistPage {
                        video_ids: (0..50).map(|i| format!("vid{i}")).collect(),
                        next_page_token: Some("t50".to_string()),
                    })
                } else {
                    Err(anyhow::anyhow!("503 backend error"))
                }
            });
        api.expect_get_video_details().times(1).returning(|ids| {
            Ok(ids.iter().map(|id| detail(id, id, "PT2M")).collect())
        });

        let videos = fetch_playlist_videos(&api, "PL_up", 200).await;
        assert_eq!(videos.len(), 50);
    }

    #[tokio::test]
    async fn detail_failure_returns_partial_results() {
        let mut api = MockYouTubeApi::new();
        api.expect_list_playlist_items().times(1).returning(|_, _, _| {
            Ok(PlaylistPage {
                video_ids: vec!["vid0".to_string()],
                next_page_token: Some("t1".to_string()),
            })
        });
        api.expect_get_video_details()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("quota exceeded")));

        let videos = fetch_playlist_videos(&api, "PL_up", 10).await;
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn empty_page_stops_the_walk() {
        let mut api = MockYouTubeApi::new();
        api.expect_list_playlist_items().times(1).returning(|_, _, _| {
            Ok(PlaylistPage {
                video_ids: vec![],
                next_page_token: Some("t1".to_string()),
            })
        });

        let videos = fetch_playlist_videos(&api, "PL_up", 10).await;
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn missing_token_stops_after_last_page() {
        let mut api = MockYouTubeApi::new();
        api.expect_list_playlist_items().times(1).returning(|_, _, _| {
            Ok(PlaylistPage {
                video_ids: vec!["vid0".to_string(), "vid1".to_string()],
                next_page_token: None,
            })
        });
        api.expect_get_video_details().times(1).returning(|ids| {
            Ok(ids.iter().map(|id| detail(id, id, "PT2M")).collect())
        });

        let videos = fetch_playlist_videos(&api, "PL_up", 500).await;
        assert_eq!(videos.len(), 2);
    }

    #[tokio::test]
    async fn unavailable_and_undated_items_are_skipped() {
        let mut api = MockYouTubeApi::new();
        api.expect_list_playlist_items().times(1).returning(|_, _, _| {
            Ok(PlaylistPage {
                video_ids: vec![
                    "a".to_string(),
                    "b".to_string(),
                    "c".to_string(),
                    "d".to_string(),
                ],
                next_page_token: None,
            })
        });
        api.expect_get_video_details().times(1).returning(|_| {
            let mut undated = detail("c", "Undated", "PT2M");
            undated.published_at = None;
            Ok(vec![
                detail("a", "Private video", "PT2M"),
                detail("b", "Deleted video", "PT2M"),
                undated,
                detail("d", "Keeper", "PT1M13S"),
            ])
        });

        let videos = fetch_playlist_videos(&api, "PL_up", 10).await;
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].youtube_video_id, "d");
        assert_eq!(videos[0].duration_seconds, 73);
    }
}
