use std::collections::HashSet;

use clipdeck_core::Video;

/// Picks the top `quota` videos by view count.
///
/// Videos below `min_view_count` are dropped, the rest are ordered by view
/// count descending (stable, so ties keep input order), and only the first
/// occurrence of each id is kept.
#[must_use]
pub fn select_videos(candidates: Vec<Video>, min_view_count: u64, quota: usize) -> Vec<Video> {
    let mut eligible: Vec<Video> = candidates
        .into_iter()
        .filter(|video| video.view_count >= min_view_count)
        .collect();
    eligible.sort_by(|a, b| b.view_count.cmp(&a.view_count));

    let mut seen = HashSet::new();
    eligible
        .into_iter()
        .filter(|video| seen.insert(video.id.clone()))
        .take(quota)
        .collect()
}
