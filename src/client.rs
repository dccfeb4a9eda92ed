use std::time::Duration;

use futures::Stream;
use reqwest::Url;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Config;
use crate::data_models::{BackendError, SearchResponse};
use crate::error::{SearchError, SearchResult, TransportError};
use crate::query::SearchRequest;

/// Stateless client for the search endpoint.
///
/// Clones share the underlying connection pool. Every call is independent, so
/// overlapping fetches are safe; ordering their results is up to the caller.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl SearchClient {
    pub fn new(endpoint: &str) -> SearchResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(TransportError::from)?;
        Self::with_http_client(endpoint, http)
    }

    pub fn from_config(config: &Config) -> SearchResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder.build().map_err(TransportError::from)?;
        Self::with_http_client(&config.endpoint, http)
    }

    pub fn with_http_client(endpoint: &str, http: reqwest::Client) -> SearchResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| TransportError::InvalidEndpoint(format!("{endpoint:?}: {e}")))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch one page. Safe to reissue with the same request after a failure.
    pub async fn fetch_page(&self, request: &SearchRequest) -> SearchResult<SearchResponse> {
        debug!(
            endpoint = %self.endpoint,
            query = request.query(),
            kind = %request.kind(),
            page = request.page().unwrap_or("<first>"),
            "fetching search page"
        );

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&request.to_params())
            .send()
            .await
            .map_err(|e| {
                warn!("search request to {} failed: {:#}", self.endpoint, e);
                TransportError::Request(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(TransportError::from)?;

        if !status.is_success() {
            let backend = serde_json::from_str::<BackendError>(&body).ok();
            warn!(%status, kind = backend.as_ref().map(|b| b.kind.as_str()), "search endpoint returned an error");
            return Err(TransportError::Status { status, backend }.into());
        }

        let page: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("undecodable search response: {:#}", e);
            SearchError::Decode(e)
        })?;

        debug!(
            episodes = page.episodes.len(),
            has_more = page.has_more(),
            "search page decoded"
        );
        Ok(page)
    }

    /// Like [`fetch_page`](Self::fetch_page), but gives up with
    /// [`SearchError::Cancelled`] once `cancel` fires.
    pub async fn fetch_page_cancellable(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> SearchResult<SearchResponse> {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(page = request.page().unwrap_or("<first>"), "search fetch cancelled");
                Err(SearchError::Cancelled)
            }
            page = self.fetch_page(request) => page,
        }
    }

    /// Fetch `first`, then keep following `next_page` cursors one at a time
    /// until the backend stops handing them out. The stream ends after the
    /// first error.
    pub fn pages(
        &self,
        first: SearchRequest,
        cancel: CancellationToken,
    ) -> impl Stream<Item = SearchResult<SearchResponse>> + Send + 'static {
        let client = self.clone();
        futures::stream::try_unfold(Some(first), move |next| {
            let client = client.clone();
            let cancel = cancel.clone();
            async move {
                let Some(request) = next else {
                    return Ok(None);
                };
                let page = client.fetch_page_cancellable(&request, &cancel).await?;
                let follow_up = page.next_request();
                Ok::<_, SearchError>(Some((page, follow_up)))
            }
        })
    }
}
