use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short-form clip discovered on the source platform, normalized for
/// ranking, publishing and storage.
///
/// Field names serialize in camelCase so stored history records stay
/// readable by every deployment that shares the same store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Platform-assigned id, e.g. `"7301234567890123456"`. Never empty.
    pub id: String,
    pub title: String,
    pub author_name: String,
    pub author_username: String,
    pub description: String,
    /// Hashtags without the leading `#`, in the order the platform lists them.
    #[serde(default)]
    pub hashtags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_count: Option<u64>,
    /// Downloadable media URL. Never empty.
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
}

impl Video {
    /// Public watch page for this clip on the source platform.
    #[must_use]
    pub fn watch_url(&self) -> String {
        format!(
            "https://www.tiktok.com/@{}/video/{}",
            self.author_username, self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_video() -> Video {
        Video {
            id: "7301".to_string(),
            title: "Messi solo goal".to_string(),
            author_name: "Edits FC".to_string(),
            author_username: "editsfc".to_string(),
            description: "Messi solo goal #messi".to_string(),
            hashtags: vec!["messi".to_string()],
            published_at: None,
            view_count: 1_200_000,
            like_count: Some(90_000),
            comment_count: None,
            share_count: None,
            video_url: "https://cdn.example.com/7301.mp4".to_string(),
            cover_url: None,
            duration_seconds: Some(14),
        }
    }

    #[test]
    fn watch_url_uses_handle_and_id() {
        assert_eq!(
            make_video().watch_url(),
            "https://www.tiktok.com/@editsfc/video/7301"
        );
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_counters() {
        let json = serde_json::to_value(make_video()).unwrap();
        assert_eq!(json["viewCount"], serde_json::json!(1_200_000));
        assert_eq!(json["likeCount"], serde_json::json!(90_000));
        assert_eq!(json["videoUrl"], "https://cdn.example.com/7301.mp4");
        assert!(json["publishedAt"].is_null());
        assert!(json.get("commentCount").is_none());
        assert!(json.get("coverUrl").is_none());
    }

    #[test]
    fn deserializes_record_written_with_millisecond_timestamp() {
        let raw = serde_json::json!({
            "id": "1",
            "title": "",
            "authorName": "",
            "authorUsername": "",
            "description": "",
            "hashtags": [],
            "publishedAt": "2024-05-01T12:00:00.000Z",
            "viewCount": 600000,
            "videoUrl": "https://cdn.example.com/1.mp4"
        });
        let video: Video = serde_json::from_value(raw).unwrap();
        assert_eq!(
            video.published_at.map(|t| t.to_rfc3339()),
            Some("2024-05-01T12:00:00+00:00".to_string())
        );
        assert!(video.like_count.is_none());
    }
}
