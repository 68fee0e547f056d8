use std::error::Error;
use hyper::body::Bytes;
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use http_body_util::Empty;
use hyper::StatusCode;
use thiserror::Error;
use native_tls::TlsConnector;
use hyper_util::rt::TokioExecutor;

#[cfg(test)]
mod tests;

pub mod models;
pub mod channels;
pub use channels::ListChannelsRequest;
pub mod playlist_items;
pub use playlist_items::{ListPlaylistItemsRequest, ListPlaylistItemsResponse, CollectVideoIdsRequest};
pub mod videos;
pub use videos::ListVideosRequest;
pub mod video_categories;
pub use video_categories::ListVideoCategoriesRequest;
pub mod comment_threads;
pub use comment_threads::{GetVideoCommentsRequest, SampleCommentsRequest};
pub mod category_summary;
pub use category_summary::fold_minor_categories;
pub(crate) mod paging;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] std::io::Error),
    #[error("TLS error: {0}")]
    TlsError(#[from] native_tls::Error),
}

pub fn initialize_client() -> Result<Client<HttpsConnector<HttpConnector>, Empty<Bytes>>, ClientError> {
    let mut http = HttpConnector::new();
    http.enforce_http(false);

    let tls = TlsConnector::builder().build()?;

    // Create an HTTPS connector using the HTTP connector and the custom TLS connector
    let https = HttpsConnector::from((http, tls.into()));

    let client = Client::builder(TokioExecutor::new())
        .build::<_, Empty<Bytes>>(https);

    Ok(client)
}

pub struct GoogleAPIRequestFields<'a> {
    pub bearer_token: Option<&'a str>,
    pub key: Option<&'a str>,
    pub referrer: Option<&'a str>,
}

pub trait GoogleAPIRequest<'a> {
    fn bearer_token(&mut self) -> &mut Option<&'a str>;

    fn key(&mut self) -> &mut Option<&'a str>;

    fn referrer(&mut self) -> &mut Option<&'a str>;

    fn with_bearer_token(mut self, bearer_token: &'a str) -> Self
    where
        Self: Sized,
    {
        *self.bearer_token() = Some(bearer_token);
        self
    }

    fn with_key(mut self, key: &'a str) -> Self
    where
        Self: Sized,
    {
        *self.key() = Some(key);
        self
    }

    fn with_referrer(mut self, referrer: &'a str) -> Self
    where
        Self: Sized,
    {
        *self.referrer() = Some(referrer);
        self
    }
}

impl<'a, T> GoogleAPIRequest<'a> for T
where
    T: AsMut<GoogleAPIRequestFields<'a>>,
{
    fn bearer_token(&mut self) -> &mut Option<&'a str> {
        &mut self.as_mut().bearer_token
    }

    fn key(&mut self) -> &mut Option<&'a str> {
        &mut self.as_mut().key
    }

    fn referrer(&mut self) -> &mut Option<&'a str> {
        &mut self.as_mut().referrer
    }
}

#[derive(Error, Debug)]
pub enum YouTubeError {
    #[error("Not found")]
    NotFound,
    #[error("Ratelimited")]
    Ratelimited,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("Comments disabled")]
    CommentsDisabled,
    #[error("Internal server error")]
    InternalServerError,
    #[error("Unknown Status Code")]
    UnknownStatusCode(StatusCode),
    #[error("Parse error")]
    ParseError(String),
    #[error("HTTP error: {0}")]
    HttpError(#[from] hyper::Error),
    #[error("Legacy HTTP error: {0}")]
    LegacyHttpError(#[from] hyper_util::client::legacy::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Other error: {0}")]
    Other(Box<dyn Error + Send + Sync>),
}

pub struct YouTubeDataV3Client {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    host: String,
}

impl YouTubeDataV3Client {
    pub fn new(host: String, client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>) -> Self {
        YouTubeDataV3Client {
            client,
            host,
        }
    }

    pub fn list_channels<'a>(&'a mut self, channel_ids: Vec<String>) -> ListChannelsRequest<'a> {
        ListChannelsRequest {
            client: &mut self.client,
            host: &self.host,
            fields: GoogleAPIRequestFields {
                bearer_token: None,
                key: None,
                referrer: None,
            },
            channel_ids,
        }
    }

    pub fn list_playlist_items<'a>(&'a mut self, playlist_id: String, page_token: Option<String>, max_results: Option<u32>) -> ListPlaylistItemsRequest<'a> {
        ListPlaylistItemsRequest {
            client: &mut self.client,
            host: &self.host,
            fields: GoogleAPIRequestFields {
                bearer_token: None,
                key: None,
                referrer: None,
            },
            playlist_id,
            page_token,
            max_results,
        }
    }

    /// Walks a playlist page by page and collects every video id it contains.
    pub fn collect_video_ids<'a>(&'a mut self, playlist_id: String) -> CollectVideoIdsRequest<'a> {
        CollectVideoIdsRequest {
            client: &mut self.client,
            host: &self.host,
            fields: GoogleAPIRequestFields {
                bearer_token: None,
                key: None,
                referrer: None,
            },
            playlist_id,
        }
    }

    pub fn list_videos<'a>(&'a mut self, video_ids: Vec<String>) -> ListVideosRequest<'a> {
        ListVideosRequest {
            client: &mut self.client,
            host: &self.host,
            fields: GoogleAPIRequestFields {
                bearer_token: None,
                key: None,
                referrer: None,
            },
            video_ids,
        }
    }

    pub fn list_video_categories<'a>(&'a mut self, category_ids: Vec<String>) -> ListVideoCategoriesRequest<'a> {
        ListVideoCategoriesRequest {
            client: &mut self.client,
            host: &self.host,
            fields: GoogleAPIRequestFields {
                bearer_token: None,
                key: None,
                referrer: None,
            },
            category_ids,
        }
    }

    pub fn sample_comments<'a>(&'a mut self, video_ids: Vec<String>) -> SampleCommentsRequest<'a> {
        SampleCommentsRequest {
            client: &mut self.client,
            host: &self.host,
            fields: GoogleAPIRequestFields {
                bearer_token: None,
                key: None,
                referrer: None,
            },
            video_ids,
        }
    }
}
