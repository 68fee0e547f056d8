
/// Flat channel statistics row. Count fields pass through as the API's
/// decimal strings; a hidden or absent field stays `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStats {
    pub channel_id: String,
    pub channel_name: Option<String>,
    pub subscribers: Option<String>,
    pub views: Option<String>,
    pub total_videos: Option<String>,
    pub uploads_playlist_id: Option<String>,
}

/// Flat per-video row with a fixed column set. Every field the API left out
/// is carried as `None` rather than dropped, so rows always line up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub video_id: String,
    pub channel_title: Option<String>,
    pub title: Option<String>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<String>,
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
    pub duration: Option<String>,
    pub definition: Option<String>,
    pub caption: Option<String>,
}

/// Up to the first ten top-level comments of one video, in the order the
/// API returned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSample {
    pub video_id: String,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct PlaylistItem {
    pub snippet: Option<PlaylistItemSnippet>,
    #[serde(rename = "contentDetails")]
    pub content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct PlaylistItemSnippet {
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "channelTitle")]
    pub channel_title: Option<String>,
    pub position: Option<u32>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct PlaylistItemContentDetails {
    #[serde(rename = "videoId")]
    pub video_id: String,
}
