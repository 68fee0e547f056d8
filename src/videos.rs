use crate::{GoogleAPIRequestFields, YouTubeError};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper::body::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{Method, Request, StatusCode};
use serde::Deserialize;
use crate::models::VideoDetails;

/// Hard cap the API puts on the number of ids per videos.list call.
pub const VIDEO_CHUNK_SIZE: usize = 50;

pub struct ListVideosRequest<'a> {
    pub client: &'a mut Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    pub host: &'a str,
    pub fields: GoogleAPIRequestFields<'a>,
    pub video_ids: Vec<String>,
}

impl<'a> AsMut<GoogleAPIRequestFields<'a>> for ListVideosRequest<'a> {
    fn as_mut(&mut self) -> &mut GoogleAPIRequestFields<'a> {
        &mut self.fields
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    items: Option<Vec<ApiVideo>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiVideo {
    id: String,
    snippet: Option<VideoSnippet>,
    statistics: Option<VideoStatistics>,
    #[serde(rename = "contentDetails")]
    content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(rename = "channelTitle")]
    channel_title: Option<String>,
    title: Option<String>,
    #[serde(rename = "categoryId")]
    category_id: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: Option<String>,
    definition: Option<String>,
    caption: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Comma-joined id parameter for each request, at most [`VIDEO_CHUNK_SIZE`]
/// ids apiece, consecutive and in input order.
pub(crate) fn chunked_id_params(video_ids: &[String]) -> Vec<String> {
    video_ids
        .chunks(VIDEO_CHUNK_SIZE)
        .map(|chunk| chunk.join(","))
        .collect()
}

/// Probes the fixed (facet, field) schema; a facet or field the response
/// left out lands as `None`, never as a dropped column.
pub(crate) fn flatten_video(video: ApiVideo) -> VideoDetails {
    VideoDetails {
        video_id: video.id,
        channel_title: video.snippet.as_ref().and_then(|s| s.channel_title.clone()),
        title: video.snippet.as_ref().and_then(|s| s.title.clone()),
        category_id: video.snippet.as_ref().and_then(|s| s.category_id.clone()),
        description: video.snippet.as_ref().and_then(|s| s.description.clone()),
        tags: video.snippet.as_ref().and_then(|s| s.tags.clone()),
        published_at: video.snippet.as_ref().and_then(|s| s.published_at.clone()),
        view_count: video.statistics.as_ref().and_then(|s| s.view_count.clone()),
        like_count: video.statistics.as_ref().and_then(|s| s.like_count.clone()),
        comment_count: video.statistics.as_ref().and_then(|s| s.comment_count.clone()),
        duration: video.content_details.as_ref().and_then(|c| c.duration.clone()),
        definition: video.content_details.as_ref().and_then(|c| c.definition.clone()),
        caption: video.content_details.as_ref().and_then(|c| c.caption.clone()),
    }
}

impl<'a> ListVideosRequest<'a> {
    pub async fn send(self) -> Result<Vec<VideoDetails>, YouTubeError> {
        let mut videos = Vec::with_capacity(self.video_ids.len());

        // One request per chunk of ids; a failing chunk aborts the whole
        // fetch, results accumulated so far included.
        for ids_param in chunked_id_params(&self.video_ids) {
            let url = format!(
                "https://{}/youtube/v3/videos?part=snippet,contentDetails,statistics&id={}",
                self.host,
                ids_param
            );

            let mut request_builder = Request::builder()
                .method(Method::GET)
                .uri(url)
                .header("Host", "youtube.googleapis.com")
                .header("X-Goog-Fieldmask", "items(id,snippet(channelTitle,title,categoryId,description,tags,publishedAt),statistics(viewCount,likeCount,commentCount),contentDetails(duration,definition,caption))");

            if let Some(key) = self.fields.key {
                request_builder = request_builder.header("X-Goog-Api-Key", key);
            }

            if let Some(bearer_token) = self.fields.bearer_token {
                request_builder = request_builder.header("Authorization", bearer_token);
            }

            if let Some(referrer) = self.fields.referrer {
                request_builder = request_builder.header("Referer", referrer);
            }

            let req = request_builder
                .body(Empty::new())
                .map_err(|e| YouTubeError::Other(Box::new(e)))?;

            let resp = self.client.request(req).await?;

            match resp.status() {
                StatusCode::OK => (),
                StatusCode::TOO_MANY_REQUESTS => return Err(YouTubeError::Ratelimited),
                StatusCode::FORBIDDEN => {
                    let body_bytes = resp.into_body().collect().await?.to_bytes();
                    if let Ok(error_response) = serde_json::from_slice::<ErrorResponse>(&body_bytes) {
                        if error_response.error.message.starts_with("The request cannot be completed because you have exceeded your") {
                            return Err(YouTubeError::Ratelimited);
                        }
                    }
                    return Err(YouTubeError::Forbidden);
                },
                StatusCode::NOT_FOUND => return Err(YouTubeError::NotFound),
                StatusCode::UNAUTHORIZED => return Err(YouTubeError::Unauthorized),
                StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
                    return Err(YouTubeError::InternalServerError)
                },
                status => {
                    let body_bytes = resp.into_body().collect().await?.to_bytes();
                    let body_str = String::from_utf8_lossy(&body_bytes);
                    tracing::warn!("Unknown status code {}: {}", status.as_u16(), body_str);
                    return Err(YouTubeError::UnknownStatusCode(status));
                },
            };

            let body_bytes = resp.into_body().collect().await?.to_bytes();
            let api_response: ApiResponse = serde_json::from_slice(&body_bytes)?;

            // Rows keep chunk order, then the API's order within the chunk.
            // Ids the API did not echo back (deleted or private videos) get
            // no row at all.
            videos.extend(
                api_response.items
                    .unwrap_or_default()
                    .into_iter()
                    .map(flatten_video),
            );
        }

        Ok(videos)
    }
}
