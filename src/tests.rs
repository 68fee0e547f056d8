use std::collections::{HashMap, HashSet, VecDeque};
use serde_json::json;

use crate::YouTubeError;
use crate::category_summary::{fold_minor_categories, OTHERS_LABEL};
use crate::channels::{channel_rows, flatten_channel};
use crate::comment_threads::{first_comment_texts, sample_comments, CommentSource, COMMENT_SAMPLE_SIZE};
use crate::paging::{drain_pages, Page, PageSource};
use crate::video_categories::category_titles;
use crate::videos::{chunked_id_params, flatten_video, VIDEO_CHUNK_SIZE};

// Scripted page source: hands out pre-built pages and records the token
// each request carried.
struct ScriptedPages {
    pages: VecDeque<Result<Page<String>, YouTubeError>>,
    tokens_seen: Vec<Option<String>>,
}

impl ScriptedPages {
    fn new(pages: Vec<Result<Page<String>, YouTubeError>>) -> Self {
        ScriptedPages {
            pages: pages.into(),
            tokens_seen: Vec::new(),
        }
    }
}

impl PageSource for ScriptedPages {
    type Item = String;

    async fn fetch_page(&mut self, page_token: Option<&str>) -> Result<Page<String>, YouTubeError> {
        self.tokens_seen.push(page_token.map(str::to_string));
        self.pages
            .pop_front()
            .unwrap_or_else(|| panic!("fetched past the scripted pages"))
    }
}

fn page(ids: &[&str], next: Option<&str>) -> Result<Page<String>, YouTubeError> {
    Ok(Page {
        items: ids.iter().map(|id| id.to_string()).collect(),
        next_page_token: next.map(str::to_string),
    })
}

#[tokio::test]
async fn test_pagination_single_page() {
    let mut source = ScriptedPages::new(vec![page(&["a", "b"], None)]);

    let ids = drain_pages(&mut source).await.unwrap();

    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(source.tokens_seen, vec![None]);
}

#[tokio::test]
async fn test_pagination_follows_tokens_in_order() {
    let mut source = ScriptedPages::new(vec![
        page(&["a", "b"], Some("t1")),
        page(&["c"], Some("t2")),
        page(&["d", "e"], None),
    ]);

    let ids = drain_pages(&mut source).await.unwrap();

    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    // Each request carries the token of the immediately preceding response.
    assert_eq!(
        source.tokens_seen,
        vec![None, Some("t1".to_string()), Some("t2".to_string())]
    );
}

#[tokio::test]
async fn test_pagination_empty_page_mid_stream() {
    let mut source = ScriptedPages::new(vec![
        page(&["a"], Some("t1")),
        page(&[], Some("t2")),
        page(&["b"], None),
    ]);

    let ids = drain_pages(&mut source).await.unwrap();

    // The empty page neither loses nor duplicates a request.
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(source.tokens_seen.len(), 3);
}

#[tokio::test]
async fn test_pagination_no_token_on_first_page() {
    let mut source = ScriptedPages::new(vec![page(&[], None)]);

    let ids = drain_pages(&mut source).await.unwrap();

    assert!(ids.is_empty());
    assert_eq!(source.tokens_seen, vec![None]);
}

#[tokio::test]
async fn test_pagination_failure_abandons_collection() {
    let mut source = ScriptedPages::new(vec![
        page(&["a"], Some("t1")),
        Err(YouTubeError::Ratelimited),
    ]);

    let result = drain_pages(&mut source).await;

    assert!(matches!(result, Err(YouTubeError::Ratelimited)));
    assert_eq!(source.tokens_seen.len(), 2);
}

#[test]
fn test_chunked_id_params_request_count() {
    let ids = |n: usize| (0..n).map(|i| format!("vid{}", i)).collect::<Vec<_>>();

    assert!(chunked_id_params(&ids(0)).is_empty());
    assert_eq!(chunked_id_params(&ids(1)).len(), 1);
    assert_eq!(chunked_id_params(&ids(VIDEO_CHUNK_SIZE)).len(), 1);
    assert_eq!(chunked_id_params(&ids(VIDEO_CHUNK_SIZE + 1)).len(), 2);
    assert_eq!(chunked_id_params(&ids(125)).len(), 3);
}

#[test]
fn test_chunked_id_params_preserves_order() {
    let ids: Vec<String> = (0..60).map(|i| format!("vid{}", i)).collect();

    let params = chunked_id_params(&ids);

    assert_eq!(params.len(), 2);
    assert!(params[0].starts_with("vid0,vid1,"));
    assert!(params[0].ends_with("vid49"));
    assert_eq!(params[1], ids[50..].join(","));
}

#[test]
fn test_flatten_video_full() {
    let video = serde_json::from_value::<crate::videos::ApiVideo>(json!({
        "id": "9bqk6ZUsKyA",
        "snippet": {
            "channelTitle": "MrBeast",
            "title": "I Spent 50 Hours Buried Alive",
            "categoryId": "24",
            "description": "Thanks for watching",
            "tags": ["mrbeast", "challenge"],
            "publishedAt": "2021-03-27T20:00:07Z"
        },
        "statistics": {
            "viewCount": "100000",
            "likeCount": "5000",
            "commentCount": "1000"
        },
        "contentDetails": {
            "duration": "PT13M29S",
            "definition": "hd",
            "caption": "true"
        }
    }))
    .unwrap();

    let details = flatten_video(video);

    assert_eq!(details.video_id, "9bqk6ZUsKyA");
    assert_eq!(details.channel_title, Some("MrBeast".to_string()));
    assert_eq!(details.title, Some("I Spent 50 Hours Buried Alive".to_string()));
    assert_eq!(details.category_id, Some("24".to_string()));
    assert_eq!(details.description, Some("Thanks for watching".to_string()));
    assert_eq!(details.tags, Some(vec!["mrbeast".to_string(), "challenge".to_string()]));
    assert_eq!(details.published_at, Some("2021-03-27T20:00:07Z".to_string()));
    assert_eq!(details.view_count, Some("100000".to_string()));
    assert_eq!(details.like_count, Some("5000".to_string()));
    assert_eq!(details.comment_count, Some("1000".to_string()));
    assert_eq!(details.duration, Some("PT13M29S".to_string()));
    assert_eq!(details.definition, Some("hd".to_string()));
    assert_eq!(details.caption, Some("true".to_string()));
}

#[test]
fn test_flatten_video_missing_fields_become_none() {
    // Statistics disabled, no tags, no contentDetails at all.
    let video = serde_json::from_value::<crate::videos::ApiVideo>(json!({
        "id": "v6Xz96NIGGA",
        "snippet": {
            "channelTitle": "ladybody",
            "title": "untitled",
            "categoryId": "22",
            "description": "",
            "publishedAt": "2007-12-14T20:16:22Z"
        }
    }))
    .unwrap();

    let details = flatten_video(video);

    assert_eq!(details.video_id, "v6Xz96NIGGA");
    assert_eq!(details.channel_title, Some("ladybody".to_string()));
    assert_eq!(details.description, Some("".to_string()));
    assert_eq!(details.tags, None);
    assert_eq!(details.view_count, None);
    assert_eq!(details.like_count, None);
    assert_eq!(details.comment_count, None);
    assert_eq!(details.duration, None);
    assert_eq!(details.definition, None);
    assert_eq!(details.caption, None);
}

#[test]
fn test_flatten_video_empty_tags_stay_present() {
    let video = serde_json::from_value::<crate::videos::ApiVideo>(json!({
        "id": "abc",
        "snippet": { "tags": [] }
    }))
    .unwrap();

    let details = flatten_video(video);

    assert_eq!(details.tags, Some(Vec::new()));
    assert_eq!(details.title, None);
}

#[test]
fn test_flatten_channel_full() {
    let channel = serde_json::from_value::<crate::channels::ApiChannel>(json!({
        "id": "UCY30JRSgfhYXA6i6xX1erWg",
        "snippet": { "title": "Smosh" },
        "statistics": {
            "subscriberCount": "25000000",
            "viewCount": "10000000000",
            "videoCount": "1935"
        },
        "contentDetails": {
            "relatedPlaylists": { "uploads": "UUY30JRSgfhYXA6i6xX1erWg" }
        }
    }))
    .unwrap();

    let stats = flatten_channel(channel);

    assert_eq!(stats.channel_id, "UCY30JRSgfhYXA6i6xX1erWg");
    assert_eq!(stats.channel_name, Some("Smosh".to_string()));
    assert_eq!(stats.subscribers, Some("25000000".to_string()));
    assert_eq!(stats.views, Some("10000000000".to_string()));
    assert_eq!(stats.total_videos, Some("1935".to_string()));
    assert_eq!(stats.uploads_playlist_id, Some("UUY30JRSgfhYXA6i6xX1erWg".to_string()));
}

#[test]
fn test_flatten_channel_hidden_subscribers() {
    let channel = serde_json::from_value::<crate::channels::ApiChannel>(json!({
        "id": "UCyj-EUmmEfIlUg-pYVn-vxw",
        "snippet": { "title": "ladybody" },
        "statistics": {
            "viewCount": "657",
            "videoCount": "3"
        }
    }))
    .unwrap();

    let stats = flatten_channel(channel);

    assert_eq!(stats.subscribers, None);
    assert_eq!(stats.views, Some("657".to_string()));
    assert_eq!(stats.uploads_playlist_id, None);
}

#[test]
fn test_channel_rows_keeps_response_order() {
    let response = serde_json::from_value::<crate::channels::ApiResponse>(json!({
        "items": [
            { "id": "UC2" },
            { "id": "UC1" }
        ]
    }))
    .unwrap();

    let rows = channel_rows(response);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].channel_id, "UC2");
    assert_eq!(rows[1].channel_id, "UC1");
}

#[test]
fn test_channel_rows_empty_items() {
    let response = serde_json::from_value::<crate::channels::ApiResponse>(json!({
        "items": []
    }))
    .unwrap();

    assert!(channel_rows(response).is_empty());

    // The items key can be missing entirely.
    let response = serde_json::from_value::<crate::channels::ApiResponse>(json!({})).unwrap();
    assert!(channel_rows(response).is_empty());
}

#[test]
fn test_category_titles_mapping() {
    let response = serde_json::from_value::<crate::video_categories::ApiResponse>(json!({
        "items": [
            { "id": "10", "snippet": { "title": "Music" } },
            { "id": "24", "snippet": { "title": "Entertainment" } }
        ]
    }))
    .unwrap();

    let titles = category_titles(response);

    assert_eq!(titles.len(), 2);
    assert_eq!(titles.get("10").map(String::as_str), Some("Music"));
    assert_eq!(titles.get("24").map(String::as_str), Some("Entertainment"));
}

#[test]
fn test_category_titles_empty_items() {
    let response = serde_json::from_value::<crate::video_categories::ApiResponse>(json!({
        "items": []
    }))
    .unwrap();

    assert!(category_titles(response).is_empty());
}

#[test]
fn test_category_titles_skips_untitled_entries() {
    let response = serde_json::from_value::<crate::video_categories::ApiResponse>(json!({
        "items": [
            { "id": "10", "snippet": { "title": "Music" } },
            { "id": "44" }
        ]
    }))
    .unwrap();

    let titles = category_titles(response);

    assert_eq!(titles.len(), 1);
    assert!(titles.contains_key("10"));
}

#[test]
fn test_first_comment_texts_caps_at_sample_size() {
    let items: Vec<_> = (0..12)
        .map(|i| json!({
            "snippet": {
                "topLevelComment": {
                    "snippet": { "textOriginal": format!("comment {}", i) }
                }
            }
        }))
        .collect();
    let response = serde_json::from_value::<crate::comment_threads::ApiResponse>(json!({
        "items": items
    }))
    .unwrap();

    let comments = first_comment_texts(response);

    assert_eq!(comments.len(), COMMENT_SAMPLE_SIZE);
    assert_eq!(comments[0], "comment 0");
    assert_eq!(comments[9], "comment 9");
}

#[test]
fn test_first_comment_texts_short_page() {
    let response = serde_json::from_value::<crate::comment_threads::ApiResponse>(json!({
        "items": [
            { "snippet": { "topLevelComment": { "snippet": { "textOriginal": "first" } } } }
        ]
    }))
    .unwrap();

    assert_eq!(first_comment_texts(response), vec!["first"]);
}

// Scripted comment source: fails for a chosen set of videos, succeeds for
// the rest, and records every lookup.
struct ScriptedComments {
    failing: HashSet<String>,
    calls: Vec<String>,
}

impl CommentSource for ScriptedComments {
    async fn top_level_comments(&mut self, video_id: &str) -> Result<Vec<String>, YouTubeError> {
        self.calls.push(video_id.to_string());
        if self.failing.contains(video_id) {
            Err(YouTubeError::CommentsDisabled)
        } else {
            Ok(vec![format!("comment on {}", video_id)])
        }
    }
}

#[tokio::test]
async fn test_sample_comments_skips_failing_videos() {
    let video_ids: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
    let mut source = ScriptedComments {
        failing: ["b", "d"].iter().map(|s| s.to_string()).collect(),
        calls: Vec::new(),
    };

    let samples = sample_comments(&mut source, &video_ids).await;

    // One bad video never aborts the batch; failing ones are simply absent.
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].video_id, "a");
    assert_eq!(samples[0].comments, vec!["comment on a"]);
    assert_eq!(samples[1].video_id, "c");
    assert_eq!(source.calls, video_ids);
}

#[tokio::test]
async fn test_sample_comments_all_failing() {
    let video_ids: Vec<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
    let mut source = ScriptedComments {
        failing: video_ids.iter().cloned().collect(),
        calls: Vec::new(),
    };

    let samples = sample_comments(&mut source, &video_ids).await;

    assert!(samples.is_empty());
    assert_eq!(source.calls.len(), 2);
}

fn counts(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_fold_minor_categories_basic() {
    let mut table = counts(&[("A", 50), ("B", 30), ("C", 15), ("D", 5)]);

    fold_minor_categories(&mut table);

    // Only D is under 10% of the original total of 100.
    assert_eq!(table, counts(&[("A", 50), ("B", 30), ("C", 15), ("Others", 5)]));
}

#[test]
fn test_fold_minor_categories_all_major() {
    let mut table = counts(&[("A", 60), ("B", 40)]);

    fold_minor_categories(&mut table);

    assert_eq!(table, counts(&[("A", 60), ("B", 40), ("Others", 0)]));
}

#[test]
fn test_fold_minor_categories_stable_on_refold() {
    let mut table = counts(&[("A", 50), ("B", 40), (OTHERS_LABEL, 0)]);

    fold_minor_categories(&mut table);

    // A zero-count Others is minor, gets removed and re-added at zero; the
    // major entries survive untouched.
    assert_eq!(table, counts(&[("A", 50), ("B", 40), ("Others", 0)]));
}

#[test]
fn test_fold_minor_categories_folds_existing_others() {
    let mut table = counts(&[("A", 90), ("B", 5), (OTHERS_LABEL, 5)]);

    fold_minor_categories(&mut table);

    assert_eq!(table, counts(&[("A", 90), ("Others", 10)]));
}

#[test]
fn test_fold_minor_categories_empty_table() {
    let mut table: HashMap<String, u64> = HashMap::new();

    fold_minor_categories(&mut table);

    assert!(table.is_empty());
}

#[test]
fn test_fold_minor_categories_all_zero_counts() {
    let mut table = counts(&[("A", 0), ("B", 0)]);

    fold_minor_categories(&mut table);

    // Shares are undefined at a zero total; nothing is folded away.
    assert_eq!(table, counts(&[("A", 0), ("B", 0), ("Others", 0)]));
}
