//! Paginated requests as streams

use super::types::{NextPage, PageEnvelope, PageNumberPaginator, PaginationState};
use crate::decode::{self, Record};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::{JsonValue, Method};
use futures::stream::{self, Stream, TryStreamExt};
use tracing::debug;

/// Stream every item of a paginated listing.
///
/// Pages are fetched lazily, one request per page, in order. The first
/// error ends the stream.
pub fn paginate<'a>(
    client: &'a HttpClient,
    method: Method,
    path: &'a str,
    config: RequestConfig,
) -> impl Stream<Item = Result<JsonValue>> + 'a {
    let seed = (PageNumberPaginator::new(), PaginationState::new(), config);

    stream::try_unfold(seed, move |(paginator, mut state, config)| async move {
        if state.done {
            return Ok(None);
        }

        let mut page_config = config.clone();
        for (key, value) in paginator.params(&state) {
            page_config = page_config.query(key, value);
        }

        let body = client.request(method, path, page_config).await?;
        let envelope: PageEnvelope = decode::record("page", body)?;
        let requested = state.page;

        let next = paginator.process_page(&envelope, &mut state);
        debug!(
            "Fetched page {} of {} from {} ({} items)",
            requested + 1,
            envelope.pages_count,
            path,
            envelope.items.len()
        );
        if let NextPage::Done = next {
            debug!("Pagination of {} complete: {} items", path, state.total_fetched);
        }

        let items = stream::iter(envelope.items.into_iter().map(Ok::<_, Error>));
        Ok::<_, Error>(Some((items, (paginator, state, config))))
    })
    .try_flatten()
}

/// Collect every item of a paginated listing
pub async fn collect_all(
    client: &HttpClient,
    method: Method,
    path: &str,
    config: RequestConfig,
) -> Result<Vec<JsonValue>> {
    paginate(client, method, path, config).try_collect().await
}

/// Collect and map every item of a paginated GET listing
pub async fn fetch_all<T: Record>(
    client: &HttpClient,
    path: &str,
    config: RequestConfig,
) -> Result<Vec<T>> {
    let items = collect_all(client, Method::GET, path, config).await?;
    items.into_iter().map(decode::decode).collect()
}
