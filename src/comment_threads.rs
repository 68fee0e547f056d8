use crate::{GoogleAPIRequestFields, YouTubeError};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper::body::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{Method, Request, StatusCode};
use serde::Deserialize;
use crate::models::CommentSample;

/// Top-level comments kept per video, all taken from the first response
/// page.
pub const COMMENT_SAMPLE_SIZE: usize = 10;

pub struct GetVideoCommentsRequest<'a> {
    pub client: &'a mut Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    pub host: &'a str,
    pub fields: GoogleAPIRequestFields<'a>,
    pub video_id: String,
}

impl<'a> AsMut<GoogleAPIRequestFields<'a>> for GetVideoCommentsRequest<'a> {
    fn as_mut(&mut self) -> &mut GoogleAPIRequestFields<'a> {
        &mut self.fields
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    items: Vec<ThreadItem>,
}

#[derive(Debug, Deserialize)]
struct ThreadItem {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
struct ThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentSnippet {
    #[serde(rename = "textOriginal")]
    text_original: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Plain text of at most the first [`COMMENT_SAMPLE_SIZE`] top-level
/// comments, platform order.
pub(crate) fn first_comment_texts(response: ApiResponse) -> Vec<String> {
    response.items
        .into_iter()
        .take(COMMENT_SAMPLE_SIZE)
        .map(|item| item.snippet.top_level_comment.snippet.text_original)
        .collect()
}

impl<'a> GetVideoCommentsRequest<'a> {
    pub async fn send(self) -> Result<Vec<String>, YouTubeError> {
        let url = format!(
            "https://{}/youtube/v3/commentThreads?part=snippet,replies&videoId={}&textFormat=plainText",
            self.host, self.video_id
        );

        let mut request_builder = Request::builder()
            .method(Method::GET)
            .uri(url)
            .header("Host", "youtube.googleapis.com")
            .header(
                "X-Goog-Fieldmask",
                "items.snippet.topLevelComment.snippet.textOriginal",
            );

        if let Some(key) = self.fields.key {
            request_builder = request_builder.header("X-Goog-Api-Key", key);
        }

        if let Some(bearer_token) = self.fields.bearer_token {
            request_builder = request_builder.header("Authorization", bearer_token);
        }

        if let Some(referrer) = self.fields.referrer {
            if !referrer.is_empty() {
                request_builder = request_builder.header("Referer", referrer);
            }
        }

        let req = request_builder
            .body(Empty::new())
            .map_err(|e| YouTubeError::Other(Box::new(e)))?;

        let resp = self.client.request(req).await?;

        match resp.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(YouTubeError::Ratelimited),
            StatusCode::FORBIDDEN => {
                let body_bytes = resp.into_body().collect().await?.to_bytes();
                match serde_json::from_slice::<ErrorResponse>(&body_bytes) {
                    Ok(error_response) => {
                        match error_response.error.message.as_str() {
                            msg if msg.contains("parameter has disabled comments") => {
                                return Err(YouTubeError::CommentsDisabled)
                            },
                            msg if msg.starts_with("The request cannot be completed because you have exceeded your") => {
                                return Err(YouTubeError::Ratelimited)
                            },
                            msg => {
                                tracing::warn!("Unknown forbidden error message: {}", msg);
                                return Err(YouTubeError::Forbidden)
                            }
                        }
                    },
                    Err(_) => return Err(YouTubeError::Forbidden),
                }
            },
            StatusCode::NOT_FOUND => return Err(YouTubeError::NotFound),
            StatusCode::UNAUTHORIZED => return Err(YouTubeError::Unauthorized),
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
                return Err(YouTubeError::InternalServerError)
            },
            StatusCode::OK => (),
            status => {
                let body_bytes = resp.into_body().collect().await?.to_bytes();
                let body_str = String::from_utf8_lossy(&body_bytes);
                tracing::warn!("Unknown status code {}: {}", status.as_u16(), body_str);
                return Err(YouTubeError::UnknownStatusCode(status));
            },
        };

        let body_bytes = resp.into_body().collect().await?.to_bytes();
        let api_response: ApiResponse = serde_json::from_slice(&body_bytes)?;

        Ok(first_comment_texts(api_response))
    }
}

/// Per-video comment lookup behind the sampling loop. The HTTP impl lives
/// on [`SampleCommentsRequest`]; tests script their own.
pub(crate) trait CommentSource {
    async fn top_level_comments(&mut self, video_id: &str) -> Result<Vec<String>, YouTubeError>;
}

/// One lookup per video, each failure contained to its own video. A video
/// whose lookup fails (commonly: comments disabled) is logged and left out
/// of the output; everything else proceeds.
pub(crate) async fn sample_comments<S: CommentSource>(source: &mut S, video_ids: &[String]) -> Vec<CommentSample> {
    let mut samples = Vec::new();

    for video_id in video_ids {
        match source.top_level_comments(video_id).await {
            Ok(comments) => samples.push(CommentSample {
                video_id: video_id.clone(),
                comments,
            }),
            Err(err) => {
                tracing::warn!("Could not get comments for video {}: {}", video_id, err);
            }
        }
    }

    samples
}

pub struct SampleCommentsRequest<'a> {
    pub client: &'a mut Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    pub host: &'a str,
    pub fields: GoogleAPIRequestFields<'a>,
    pub video_ids: Vec<String>,
}

impl<'a> AsMut<GoogleAPIRequestFields<'a>> for SampleCommentsRequest<'a> {
    fn as_mut(&mut self) -> &mut GoogleAPIRequestFields<'a> {
        &mut self.fields
    }
}

impl<'a> CommentSource for SampleCommentsRequest<'a> {
    async fn top_level_comments(&mut self, video_id: &str) -> Result<Vec<String>, YouTubeError> {
        GetVideoCommentsRequest {
            client: &mut *self.client,
            host: self.host,
            fields: GoogleAPIRequestFields {
                bearer_token: self.fields.bearer_token,
                key: self.fields.key,
                referrer: self.fields.referrer,
            },
            video_id: video_id.to_string(),
        }
        .send()
        .await
    }
}

impl<'a> SampleCommentsRequest<'a> {
    pub async fn send(mut self) -> Vec<CommentSample> {
        let video_ids = std::mem::take(&mut self.video_ids);
        sample_comments(&mut self, &video_ids).await
    }
}
