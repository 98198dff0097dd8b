//! Normalization from raw actor items to [`clipdeck_core::Video`].
//!
//! Each attribute is resolved from a fixed list of candidate fields; the first
//! non-blank value wins. An item without an id or without a downloadable media
//! URL is rejected (`None`), never an error.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use clipdeck_core::Video;

use crate::types::{RawId, RawTimestamp, RawVideo};

/// Normalizes a raw actor item into a [`Video`].
///
/// Returns `None` when the item has no usable id or media URL.
#[must_use]
pub fn normalize_video(item: RawVideo) -> Option<Video> {
    let hashtags = resolve_hashtags(&item);
    let RawVideo {
        id,
        id_str,
        title,
        desc,
        text,
        create_time,
        create_time_iso,
        author,
        author_meta,
        stats,
        play_count,
        digg_count,
        comment_count,
        share_count,
        video,
        video_meta,
        covers,
        ..
    } = item;

    let id = first_present([id.map(RawId::into_string), id_str])?;

    let media = video.unwrap_or_default();
    let meta = video_meta.unwrap_or_default();
    let video_url = first_present([media.download_addr, meta.download_addr])?;

    let author = author.unwrap_or_default();
    let author_meta = author_meta.unwrap_or_default();
    let stats = stats.unwrap_or_default();
    let covers = covers.unwrap_or_default();

    let resolved_title =
        first_present([title.clone(), desc.clone(), text.clone()]).unwrap_or_default();
    let description = first_present([desc, text, title]).unwrap_or_default();

    let author_name =
        first_present([author.nickname, author_meta.nick_name]).unwrap_or_default();
    let author_username = first_present([
        author.unique_id,
        author.id.map(RawId::into_string),
        author_meta.name,
    ])
    .unwrap_or_default();

    let cover_url = first_present([
        media.dynamic_cover,
        media.origin_cover,
        media.cover,
        covers.dynamic,
        covers.origin,
        covers.default,
        meta.cover_url,
    ]);

    let published_at = create_time
        .as_ref()
        .and_then(parse_timestamp)
        .or_else(|| create_time_iso.as_deref().and_then(parse_datetime));

    let duration_seconds = media
        .duration
        .or(meta.duration)
        .and_then(|d| u32::try_from(d).ok());

    Some(Video {
        id,
        title: resolved_title,
        author_name,
        author_username,
        description,
        hashtags,
        published_at,
        view_count: stats.play_count.or(play_count).unwrap_or(0),
        like_count: stats.digg_count.or(digg_count),
        comment_count: stats.comment_count.or(comment_count),
        share_count: stats.share_count.or(share_count),
        video_url,
        cover_url,
        duration_seconds,
    })
}

/// Normalizes a batch, silently dropping rejected items.
///
/// Input order is preserved.
#[must_use]
pub fn normalize_all(items: Vec<RawVideo>) -> Vec<Video> {
    let total = items.len();
    let videos: Vec<Video> = items.into_iter().filter_map(normalize_video).collect();
    if videos.len() < total {
        tracing::debug!(
            total,
            kept = videos.len(),
            "normalize: dropped items without id or media url"
        );
    }
    videos
}

/// `hashtags[].name` when that yields anything, otherwise `challenges[].title`.
fn resolve_hashtags(item: &RawVideo) -> Vec<String> {
    let primary: Vec<String> = item
        .hashtags
        .iter()
        .flatten()
        .flatten()
        .filter_map(|tag| non_blank(tag.name.clone()))
        .collect();
    if !primary.is_empty() {
        return primary;
    }

    item.challenges
        .iter()
        .flatten()
        .flatten()
        .filter_map(|challenge| non_blank(challenge.title.clone()))
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn parse_timestamp(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Seconds(secs) => Utc.timestamp_opt(*secs, 0).single(),
        RawTimestamp::FractionalSeconds(secs) if secs.is_finite() => {
            DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
        }
        RawTimestamp::FractionalSeconds(_) => None,
        RawTimestamp::Text(text) => parse_datetime(text),
    }
}

/// Parses an RFC 3339 date-time, a naive `YYYY-MM-DD HH:MM:SS` (taken as UTC),
/// or a bare `YYYY-MM-DD`. Anything else yields `None`.
fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().find_map(non_blank)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
