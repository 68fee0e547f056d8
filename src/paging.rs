use crate::YouTubeError;

pub(crate) struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

/// One page-granular view of a list endpoint. `fetch_page` is handed the
/// continuation token from the previous response, or `None` for the first
/// request.
pub(crate) trait PageSource {
    type Item;

    async fn fetch_page(&mut self, page_token: Option<&str>) -> Result<Page<Self::Item>, YouTubeError>;
}

/// Follows continuation tokens until the source stops returning one. Each
/// request carries the token of the immediately preceding response; a page
/// without a token (including the very first) ends the loop. Empty pages
/// advance like any other.
pub(crate) async fn drain_pages<S: PageSource>(source: &mut S) -> Result<Vec<S::Item>, YouTubeError> {
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = source.fetch_page(page_token.as_deref()).await?;
        items.extend(page.items);

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(items)
}
