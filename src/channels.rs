use crate::{GoogleAPIRequestFields, YouTubeError};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper::body::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{Method, Request, StatusCode};
use serde::Deserialize;
use crate::models::ChannelStats;

pub struct ListChannelsRequest<'a> {
    pub client: &'a mut Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    pub host: &'a str,
    pub fields: GoogleAPIRequestFields<'a>,
    pub channel_ids: Vec<String>,
}

impl<'a> AsMut<GoogleAPIRequestFields<'a>> for ListChannelsRequest<'a> {
    fn as_mut(&mut self) -> &mut GoogleAPIRequestFields<'a> {
        &mut self.fields
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    items: Option<Vec<ApiChannel>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiChannel {
    id: String,
    snippet: Option<ChannelSnippet>,
    statistics: Option<ChannelStatistics>,
    #[serde(rename = "contentDetails")]
    content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelStatistics {
    #[serde(rename = "subscriberCount")]
    subscriber_count: Option<String>,
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "videoCount")]
    video_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelContentDetails {
    #[serde(rename = "relatedPlaylists")]
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Rows come back in response order, which the API does not promise to
/// match the requested id order.
pub(crate) fn channel_rows(response: ApiResponse) -> Vec<ChannelStats> {
    response.items
        .unwrap_or_default()
        .into_iter()
        .map(flatten_channel)
        .collect()
}

pub(crate) fn flatten_channel(channel: ApiChannel) -> ChannelStats {
    ChannelStats {
        channel_id: channel.id,
        channel_name: channel.snippet.and_then(|s| s.title),
        subscribers: channel.statistics.as_ref().and_then(|s| s.subscriber_count.clone()),
        views: channel.statistics.as_ref().and_then(|s| s.view_count.clone()),
        total_videos: channel.statistics.as_ref().and_then(|s| s.video_count.clone()),
        uploads_playlist_id: channel.content_details
            .and_then(|c| c.related_playlists)
            .and_then(|p| p.uploads),
    }
}

impl<'a> ListChannelsRequest<'a> {

    pub async fn send(self) -> Result<Vec<ChannelStats>, YouTubeError> {

        let url = format!(
            "https://{}/youtube/v3/channels?part=snippet,contentDetails,statistics&id={}",
            self.host,
            self.channel_ids.join(",")
        );

        let mut request_builder = Request::builder()
            .method(Method::GET)
            .uri(url)
            .header("Host", "youtube.googleapis.com")
            .header("X-Goog-Fieldmask", "items(id,snippet.title,statistics(subscriberCount,viewCount,videoCount),contentDetails.relatedPlaylists.uploads)");

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
            StatusCode::TOO_MANY_REQUESTS => return Err(YouTubeError::Ratelimited),
            StatusCode::FORBIDDEN => {
                let body_bytes = resp.into_body().collect().await?.to_bytes();
                match serde_json::from_slice::<ErrorResponse>(&body_bytes) {
                    Ok(error_response) => {
                        match error_response.error.message.as_str() {
                            msg if msg.starts_with("The request cannot be completed because you have exceeded your") => {
                                return Err(YouTubeError::Ratelimited)
                            },
                            _ => {
                                tracing::warn!("Unknown forbidden error message: {}", error_response.error.message);
                                return Err(YouTubeError::Forbidden)
                            }
                        }
                    },
                    Err(e) => {
                        let body_str = String::from_utf8_lossy(&body_bytes);
                        tracing::warn!("Failed to parse error response: {}\nResponse body: {}", e, body_str);
                        return Err(YouTubeError::Forbidden)
                    }
                }
            },
            StatusCode::NOT_FOUND => return Err(YouTubeError::NotFound),
            StatusCode::UNAUTHORIZED => {
                let body_bytes = resp.into_body().collect().await?.to_bytes();
                let body_str = String::from_utf8_lossy(&body_bytes);
                tracing::warn!("Unauthorized error response: {}", body_str);
                return Err(YouTubeError::Unauthorized);
            },
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => {
                return Err(YouTubeError::InternalServerError)
            },
            StatusCode::OK => (), // Continue processing
            status => {
                let body_bytes = resp.into_body().collect().await?.to_bytes();
                let body_str = String::from_utf8_lossy(&body_bytes);
                tracing::warn!("Unknown status code {}: {}", status.as_u16(), body_str);
                return Err(YouTubeError::UnknownStatusCode(status));
            },
        };

        let body_bytes = resp.into_body().collect().await?.to_bytes();
        let api_response: ApiResponse = serde_json::from_slice(&body_bytes)?;

        Ok(channel_rows(api_response))

    }

}
