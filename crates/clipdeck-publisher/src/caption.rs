use clipdeck_core::Video;

/// TikTok's caption limit, in characters.
pub const MAX_CAPTION_CHARS: usize = 2200;

const FALLBACK_BASE: &str = "Football edit";

/// Tags appended to every caption after the clip's own hashtags.
const PROMOTIONAL_TAGS: [&str; 3] = ["#football", "#footballhighlights", "#footballtiktok"];

/// Builds the post caption for a video.
///
/// The first non-empty of title, description or a fixed fallback, a blank
/// line, then the clip's hashtags followed by the promotional tags. Tags are
/// reduced to ASCII alphanumerics, lower-cased and deduplicated in first-seen
/// order.
#[must_use]
pub fn build_caption(video: &Video) -> String {
    let base = [video.title.as_str(), video.description.as_str()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or(FALLBACK_BASE);

    let mut tags: Vec<String> = Vec::new();
    let own = video.hashtags.iter().filter_map(|tag| sanitize_tag(tag));
    let promotional = PROMOTIONAL_TAGS.iter().map(ToString::to_string);
    for tag in own.chain(promotional) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    let caption = format!("{base}\n\n{}", tags.join(" "));
    caption.trim().chars().take(MAX_CAPTION_CHARS).collect()
}

fn sanitize_tag(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    (!cleaned.is_empty()).then(|| format!("#{cleaned}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_video(title: &str, description: &str, hashtags: &[&str]) -> Video {
        Video {
            id: "7301".to_string(),
            title: title.to_string(),
            author_name: "Edits FC".to_string(),
            author_username: "editsfc".to_string(),
            description: description.to_string(),
            hashtags: hashtags.iter().map(ToString::to_string).collect(),
            published_at: None,
            view_count: 1_000_000,
            like_count: None,
            comment_count: None,
            share_count: None,
            video_url: "https://cdn.example.com/7301.mp4".to_string(),
            cover_url: None,
            duration_seconds: None,
        }
    }

    #[test]
    fn caption_uses_title_then_tags() {
        let caption = build_caption(&make_video("Messi magic", "desc", &["Messi", "Barça"]));
        assert_eq!(
            caption,
            "Messi magic\n\n#messi #bara #football #footballhighlights #footballtiktok"
        );
    }

    #[test]
    fn caption_falls_back_to_description_then_default() {
        let caption = build_caption(&make_video("", "Late winner", &[]));
        assert!(caption.starts_with("Late winner\n\n"));

        let caption = build_caption(&make_video("", "", &[]));
        assert_eq!(
            caption,
            "Football edit\n\n#football #footballhighlights #footballtiktok"
        );
    }

    #[test]
    fn caption_dedupes_tags_case_insensitively() {
        let caption = build_caption(&make_video(
            "Goal",
            "",
            &["FOOTBALL", "football", "#Goal!", "goal", "***"],
        ));
        assert_eq!(
            caption,
            "Goal\n\n#football #goal #footballhighlights #footballtiktok"
        );
    }

    #[test]
    fn caption_is_truncated_to_limit() {
        let long_title = "é".repeat(3000);
        let caption = build_caption(&make_video(&long_title, "", &[]));
        assert_eq!(caption.chars().count(), MAX_CAPTION_CHARS);
        assert!(caption.chars().all(|c| c == 'é'));
    }
}
