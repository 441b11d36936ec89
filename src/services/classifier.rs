use crate::models::VideoCategory;

/// Any video at or under this duration is a Short, whatever its title says.
pub const SHORTS_MAX_DURATION_SECONDS: i64 = 60;

/// Keyword rules evaluated top to bottom against the uppercased title; the
/// first hit wins. The order is a contract: FANCAM is a specific kind of
/// live footage and must be checked before MV and LIVE. Do not reorder.
const CATEGORY_RULES: &[(VideoCategory, &[&str])] = &[
    (VideoCategory::Fancam, &["FANCAM", "직캠", "FOCUS"]),
    (VideoCategory::Mv, &["MV", "M/V", "OFFICIAL VIDEO", "MUSIC VIDEO"]),
    (VideoCategory::Live, &["LIVE", "STAGE", "PERFORMANCE", "CONCERT"]),
    (
        VideoCategory::Behind,
        &["BEHIND", "MAKING", "SKETCH", "JACKET", "RECORD"],
    ),
    (VideoCategory::Vlog, &["VLOG", "LOG", "브이로그"]),
    (VideoCategory::Interview, &["INTERVIEW", "TALK", "Q&A"]),
];

/// Classify a video from its title and duration.
pub fn classify(title: &str, duration_seconds: i64) -> VideoCategory {
    if duration_seconds <= SHORTS_MAX_DURATION_SECONDS {
        return VideoCategory::Shorts;
    }

    let title_upper = title.to_uppercase();
    for (category, keywords) in CATEGORY_RULES {
        if keywords.iter().any(|kw| title_upper.contains(kw)) {
            return *category;
        }
    }

    VideoCategory::Etc
}
