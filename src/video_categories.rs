use crate::{GoogleAPIRequestFields, YouTubeError};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper::body::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{Method, Request, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;

pub struct ListVideoCategoriesRequest<'a> {
    pub client: &'a mut Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    pub host: &'a str,
    pub fields: GoogleAPIRequestFields<'a>,
    pub category_ids: Vec<String>,
}

impl<'a> AsMut<GoogleAPIRequestFields<'a>> for ListVideoCategoriesRequest<'a> {
    fn as_mut(&mut self) -> &mut GoogleAPIRequestFields<'a> {
        &mut self.fields
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    items: Option<Vec<ApiCategory>>,
}

#[derive(Debug, Deserialize)]
struct ApiCategory {
    id: String,
    snippet: Option<CategorySnippet>,
}

#[derive(Debug, Deserialize)]
struct CategorySnippet {
    title: Option<String>,
}

pub(crate) fn category_titles(response: ApiResponse) -> HashMap<String, String> {
    let mut titles = HashMap::new();

    for category in response.items.unwrap_or_default() {
        if let Some(title) = category.snippet.and_then(|s| s.title) {
            titles.insert(category.id, title);
        }
    }

    titles
}

impl<'a> ListVideoCategoriesRequest<'a> {
    pub async fn send(self) -> Result<HashMap<String, String>, YouTubeError> {
        let mut url = format!(
            "https://{}/youtube/v3/videoCategories?part=snippet&id={}",
            self.host,
            self.category_ids.join(",")
        );

        if let Some(key) = self.fields.key {
            url.push_str(&format!("&key={}", key));
        }

        let mut req_builder = Request::builder()
            .method(Method::GET)
            .uri(url);

        if let Some(bearer_token) = self.fields.bearer_token {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", bearer_token));
        }

        if let Some(referrer) = self.fields.referrer {
            req_builder = req_builder.header("Referer", referrer);
        }

        let req = req_builder
            .body(Empty::<Bytes>::new())
            .map_err(|e| YouTubeError::Other(Box::new(e)))?;

        let res = self.client.request(req).await?;
        let status = res.status();

        match status {
            StatusCode::OK => {},
            StatusCode::NOT_FOUND => return Err(YouTubeError::NotFound),
            StatusCode::UNAUTHORIZED => return Err(YouTubeError::Unauthorized),
            StatusCode::FORBIDDEN => return Err(YouTubeError::Forbidden),
            StatusCode::TOO_MANY_REQUESTS => return Err(YouTubeError::Ratelimited),
            StatusCode::INTERNAL_SERVER_ERROR => return Err(YouTubeError::InternalServerError),
            _ => return Err(YouTubeError::UnknownStatusCode(status)),
        }

        let body = res.collect().await?.to_bytes();
        let api_response: ApiResponse = serde_json::from_slice(&body)?;

        Ok(category_titles(api_response))
    }
}
