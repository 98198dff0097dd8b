use super::*;

fn raw(value: serde_json::Value) -> RawVideo {
    serde_json::from_value(value).expect("fixture should decode as RawVideo")
}

/// A search-scraper item with every nested block populated.
fn full_item() -> serde_json::Value {
    serde_json::json!({
        "id": "7301234567890",
        "desc": "Insane solo goal #messi #football",
        "createTime": 1_714_554_000,
        "author": { "nickname": "Edits FC", "uniqueId": "editsfc", "id": "99" },
        "stats": {
            "playCount": 1_250_000,
            "diggCount": 88_000,
            "shareCount": 1_200,
            "commentCount": 430
        },
        "video": {
            "downloadAddr": "https://cdn.example.com/7301.mp4",
            "playAddr": "https://cdn.example.com/7301-play.mp4",
            "duration": 15,
            "originCover": "https://cdn.example.com/7301-origin.jpg",
            "cover": "https://cdn.example.com/7301.jpg"
        },
        "hashtags": [{ "name": "messi" }, { "name": "football" }],
        "challenges": [{ "title": "ignored" }]
    })
}

// -----------------------------------------------------------------------
// rejection
// -----------------------------------------------------------------------

#[test]
fn rejects_item_without_id() {
    let mut item = full_item();
    item.as_object_mut().unwrap().remove("id");
    assert!(normalize_video(raw(item)).is_none());
}

#[test]
fn rejects_item_with_blank_id() {
    let mut item = full_item();
    item["id"] = serde_json::json!("   ");
    assert!(normalize_video(raw(item)).is_none());
}

#[test]
fn rejects_item_without_download_addr_even_with_play_addr() {
    let mut item = full_item();
    item["video"].as_object_mut().unwrap().remove("downloadAddr");
    assert!(normalize_video(raw(item)).is_none());
}

#[test]
fn falls_back_to_id_str() {
    let mut item = full_item();
    item.as_object_mut().unwrap().remove("id");
    item["id_str"] = serde_json::json!("7301");
    let video = normalize_video(raw(item)).unwrap();
    assert_eq!(video.id, "7301");
}

#[test]
fn numeric_id_is_stringified() {
    let mut item = full_item();
    item["id"] = serde_json::json!(7_301_234_567_890_u64);
    let video = normalize_video(raw(item)).unwrap();
    assert_eq!(video.id, "7301234567890");
}

// -----------------------------------------------------------------------
// field resolution
// -----------------------------------------------------------------------

#[test]
fn maps_nested_search_scraper_fields() {
    let video = normalize_video(raw(full_item())).unwrap();
    assert_eq!(video.id, "7301234567890");
    assert_eq!(video.title, "Insane solo goal #messi #football");
    assert_eq!(video.description, "Insane solo goal #messi #football");
    assert_eq!(video.author_name, "Edits FC");
    assert_eq!(video.author_username, "editsfc");
    assert_eq!(video.view_count, 1_250_000);
    assert_eq!(video.like_count, Some(88_000));
    assert_eq!(video.comment_count, Some(430));
    assert_eq!(video.share_count, Some(1_200));
    assert_eq!(video.video_url, "https://cdn.example.com/7301.mp4");
    assert_eq!(video.duration_seconds, Some(15));
    assert_eq!(video.hashtags, vec!["messi", "football"]);
}

#[test]
fn title_prefers_title_over_desc() {
    let mut item = full_item();
    item["title"] = serde_json::json!("Messi vs Getafe");
    let video = normalize_video(raw(item)).unwrap();
    assert_eq!(video.title, "Messi vs Getafe");
    assert_eq!(video.description, "Insane solo goal #messi #football");
}

#[test]
fn description_falls_back_to_title() {
    let mut item = full_item();
    item.as_object_mut().unwrap().remove("desc");
    item["title"] = serde_json::json!("Messi vs Getafe");
    let video = normalize_video(raw(item)).unwrap();
    assert_eq!(video.description, "Messi vs Getafe");
}

#[test]
fn cover_resolution_order() {
    let video = normalize_video(raw(full_item())).unwrap();
    assert_eq!(
        video.cover_url.as_deref(),
        Some("https://cdn.example.com/7301-origin.jpg")
    );

    let mut item = full_item();
    item["video"]["dynamicCover"] = serde_json::json!("https://cdn.example.com/dyn.webp");
    let video = normalize_video(raw(item)).unwrap();
    assert_eq!(
        video.cover_url.as_deref(),
        Some("https://cdn.example.com/dyn.webp")
    );
}

#[test]
fn cover_falls_back_to_covers_block() {
    let mut item = full_item();
    let media = item["video"].as_object_mut().unwrap();
    media.remove("originCover");
    media.remove("cover");
    item["covers"] = serde_json::json!({ "default": "https://cdn.example.com/default.jpg" });
    let video = normalize_video(raw(item)).unwrap();
    assert_eq!(
        video.cover_url.as_deref(),
        Some("https://cdn.example.com/default.jpg")
    );
}

#[test]
fn missing_cover_is_none() {
    let mut item = full_item();
    let media = item["video"].as_object_mut().unwrap();
    media.remove("originCover");
    media.remove("cover");
    let video = normalize_video(raw(item)).unwrap();
    assert!(video.cover_url.is_none());
}

#[test]
fn hashtags_fall_back_to_challenges_only_when_empty() {
    let mut item = full_item();
    item["hashtags"] = serde_json::json!([{ "name": "" }, null]);
    item["challenges"] = serde_json::json!([{ "title": "footballedit" }, { "title": null }]);
    let video = normalize_video(raw(item)).unwrap();
    assert_eq!(video.hashtags, vec!["footballedit"]);
}

#[test]
fn missing_view_count_defaults_to_zero() {
    let mut item = full_item();
    item.as_object_mut().unwrap().remove("stats");
    let video = normalize_video(raw(item)).unwrap();
    assert_eq!(video.view_count, 0);
    assert!(video.like_count.is_none());
}

#[test]
fn maps_flat_clockworks_fields() {
    let item = serde_json::json!({
        "id": "555",
        "text": "Ronaldo bicycle kick",
        "createTimeISO": "2024-03-10T18:30:00.000Z",
        "authorMeta": { "name": "cr7edits", "nickName": "CR7 Edits" },
        "playCount": 2_000_000,
        "diggCount": 150_000,
        "videoMeta": {
            "downloadAddr": "https://cdn.example.com/555.mp4",
            "coverUrl": "https://cdn.example.com/555.jpg",
            "duration": 22
        }
    });
    let video = normalize_video(raw(item)).unwrap();
    assert_eq!(video.title, "Ronaldo bicycle kick");
    assert_eq!(video.author_name, "CR7 Edits");
    assert_eq!(video.author_username, "cr7edits");
    assert_eq!(video.view_count, 2_000_000);
    assert_eq!(video.like_count, Some(150_000));
    assert_eq!(video.video_url, "https://cdn.example.com/555.mp4");
    assert_eq!(video.cover_url.as_deref(), Some("https://cdn.example.com/555.jpg"));
    assert_eq!(video.duration_seconds, Some(22));
    assert_eq!(
        video.published_at.map(|t| t.to_rfc3339()),
        Some("2024-03-10T18:30:00+00:00".to_string())
    );
}

// -----------------------------------------------------------------------
// timestamps
// -----------------------------------------------------------------------

#[test]
fn numeric_create_time_is_epoch_seconds() {
    let video = normalize_video(raw(full_item())).unwrap();
    assert_eq!(
        video.published_at.map(|t| t.to_rfc3339()),
        Some("2024-05-01T09:00:00+00:00".to_string())
    );
}

#[test]
fn string_create_time_is_parsed_as_date_time() {
    let mut item = full_item();
    item["createTime"] = serde_json::json!("2024-05-01 09:00:00");
    let video = normalize_video(raw(item)).unwrap();
    assert_eq!(
        video.published_at.map(|t| t.to_rfc3339()),
        Some("2024-05-01T09:00:00+00:00".to_string())
    );
}

#[test]
fn unparseable_create_time_is_none_not_error() {
    let mut item = full_item();
    item["createTime"] = serde_json::json!("yesterday-ish");
    let video = normalize_video(raw(item)).unwrap();
    assert!(video.published_at.is_none());
}

#[test]
fn absent_create_time_is_none() {
    let mut item = full_item();
    item.as_object_mut().unwrap().remove("createTime");
    let video = normalize_video(raw(item)).unwrap();
    assert!(video.published_at.is_none());
}

// -----------------------------------------------------------------------
// normalize_all
// -----------------------------------------------------------------------

#[test]
fn normalize_all_drops_rejects_and_keeps_order() {
    let items = vec![
        raw(serde_json::json!({ "id": "a", "video": { "downloadAddr": "u1" } })),
        raw(serde_json::json!({ "id": "b" })),
        raw(serde_json::json!({ "video": { "downloadAddr": "u3" } })),
        raw(serde_json::json!({ "id": "c", "video": { "downloadAddr": "u4" } })),
    ];
    let videos = normalize_all(items);
    let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert!(videos
        .iter()
        .all(|v| !v.id.is_empty() && !v.video_url.is_empty()));
}
