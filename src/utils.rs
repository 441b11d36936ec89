use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Components are optional but must appear in H -> M -> S order.
    static ref ISO8601_DURATION: Regex =
        Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("invalid duration regex");
}

/// Parse an ISO8601 duration token (PT1H2M3S) into total seconds.
/// Malformed or unrecognized tokens yield 0 rather than an error.
pub fn parse_iso8601_duration(token: &str) -> i64 {
    let captures = match ISO8601_DURATION.captures(token) {
        Some(c) => c,
        None => return 0,
    };

    let component = |i: usize| -> i64 {
        captures
            .get(i)
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or(0)
    };

    component(1) * 3600 + component(2) * 60 + component(3)
}

/// Extract the 11-character video ID from the usual YouTube URL shapes:
/// watch?v=, youtu.be/ and /embed/.
pub fn extract_youtube_video_id(url: &str) -> Option<String> {
    use url::Url;

    let parsed_url = Url::parse(url).ok()?;
    let host = parsed_url.host_str()?;

    match host {
        "www.youtube.com" | "youtube.com" | "m.youtube.com" => {
            if parsed_url.path() == "/watch" {
                parsed_url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.to_string())
            } else if let Some(id) = parsed_url.path().strip_prefix("/embed/") {
                Some(id.to_string())
            } else {
                None
            }
        }
        "youtu.be" => parsed_url
            .path_segments()
            .and_then(|segments| segments.last())
            .map(|id| id.to_string()),
        _ => None,
    }
}
