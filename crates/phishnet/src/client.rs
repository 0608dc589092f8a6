// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{PhishNetError, Result};
use crate::models::{
    ErrorResponse, SetlistsGetRequest, SetlistsRecentRequest, SetlistsResponse,
    ShowsQueryRequest, ShowsQueryResponse,
};
use crate::query;
use crate::throttle::{IntervalThrottle, Throttle, DEFAULT_QUERY_RATE};
use reqwest::{Client, Method, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

const PHISHNET_API_BASE: &str = "https://api.phish.net/v3";
const USER_AGENT: &str = concat!("phishnet-rs/", env!("CARGO_PKG_VERSION"));
const NO_QUERY: Option<&()> = None;

/// Phish.Net API client with client-side rate limiting.
///
/// Clones share the HTTP transport and the throttle, so the configured rate
/// holds across every task using the same client.
#[derive(Clone)]
pub struct PhishNetClient {
    client: Client,
    api_key: String,
    base_url: String,
    throttle: Arc<dyn Throttle>,
}

impl fmt::Debug for PhishNetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhishNetClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

impl PhishNetClient {
    /// Create a client with default settings (120 requests/minute, public API).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder(api_key: impl Into<String>) -> PhishNetClientBuilder {
        PhishNetClientBuilder::new(api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query shows by date, venue, tour and similar filters.
    ///
    /// # Example
    /// ```no_run
    /// # use phishnet::{PhishNetClient, ShowsQueryRequest, SortOrder};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = PhishNetClient::new("my-api-key")?;
    /// let request = ShowsQueryRequest {
    ///     year: Some(1997),
    ///     order: Some(SortOrder::Asc),
    ///     ..Default::default()
    /// };
    /// let shows = client.shows_query(&request).await?;
    /// println!("{} shows", shows.count());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn shows_query(&self, request: &ShowsQueryRequest) -> Result<ShowsQueryResponse> {
        self.dispatch(Method::POST, "/shows/query", Some(request))
            .await
    }

    /// Fetch the setlist for a show id or date.
    ///
    /// # Example
    /// ```no_run
    /// # use phishnet::{PhishNetClient, SetlistsGetRequest};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = PhishNetClient::new("my-api-key")?;
    /// let date = phishnet::parse_date("1997-11-17")?;
    /// let setlists = client.setlists_get(&SetlistsGetRequest::by_date(date)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn setlists_get(&self, request: &SetlistsGetRequest) -> Result<SetlistsResponse> {
        self.dispatch(Method::GET, "/setlists/get", Some(request))
            .await
    }

    /// Setlist of the most recent show.
    pub async fn setlists_latest(&self) -> Result<SetlistsResponse> {
        self.dispatch(Method::GET, "/setlists/latest", NO_QUERY).await
    }

    /// Setlists of the most recent shows, up to `limit`.
    pub async fn setlists_recent(
        &self,
        request: &SetlistsRecentRequest,
    ) -> Result<SetlistsResponse> {
        self.dispatch(Method::GET, "/setlists/recent", Some(request))
            .await
    }

    /// Setlists of shows played on today's date in past years.
    pub async fn setlists_tiph(&self) -> Result<SetlistsResponse> {
        self.dispatch(Method::GET, "/setlists/tiph", NO_QUERY).await
    }

    /// Setlist of a randomly chosen show.
    pub async fn setlists_random(&self) -> Result<SetlistsResponse> {
        self.dispatch(Method::GET, "/setlists/random", NO_QUERY).await
    }

    /// Perform one throttled API call and decode its JSON body.
    ///
    /// The request object is encoded into query parameters (see
    /// [`crate::query`]) alongside the API key. A 200 response is decoded into
    /// `T`. Any other status is decoded as an [`ErrorResponse`] and returned
    /// as [`PhishNetError::Api`].
    pub async fn dispatch<Q, T>(&self, method: Method, path: &str, request: Option<&Q>) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.request_url(path, request)?;

        trace!(target: "phishnet", %method, path, "dispatching request");

        let response = self
            .execute(Request::new(method, url))
            .await
            .map_err(|source| PhishNetError::Network {
                target: path.to_string(),
                source: source.without_url(),
            })?;

        let status = response.status();
        debug!(target: "phishnet", path, %status, "response received");

        let body = response.bytes().await.map_err(|source| PhishNetError::Io {
            target: path.to_string(),
            source: source.without_url(),
        })?;

        if status != StatusCode::OK {
            let error: ErrorResponse =
                serde_json::from_slice(&body).map_err(|source| PhishNetError::Decoding {
                    target: path.to_string(),
                    source,
                })?;
            return Err(PhishNetError::Api {
                target: path.to_string(),
                status: status.as_u16(),
                error,
            });
        }

        serde_json::from_slice(&body).map_err(|source| PhishNetError::Decoding {
            target: path.to_string(),
            source,
        })
    }

    /// Send an already-built request through the client's throttle.
    pub async fn execute(&self, request: Request) -> reqwest::Result<Response> {
        self.throttle.acquire().await;
        self.client.execute(request).await
    }

    /// Full URL for `path`, with the encoded request and the API key as query.
    pub(crate) fn request_url<Q>(&self, path: &str, request: Option<&Q>) -> Result<Url>
    where
        Q: Serialize + ?Sized,
    {
        let mut pairs = match request {
            Some(request) => query::encode(request).map_err(|source| PhishNetError::Encoding {
                target: path.to_string(),
                source,
            })?,
            None => Vec::new(),
        };
        pairs.push(("apikey".to_string(), self.api_key.clone()));
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut url = Url::parse(&format!("{}{}", self.base_url, path)).map_err(|source| {
            PhishNetError::RequestConstruction {
                target: path.to_string(),
                source,
            }
        })?;
        url.query_pairs_mut().extend_pairs(&pairs);

        Ok(url)
    }
}

/// Builder for configuring a Phish.Net client.
pub struct PhishNetClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
    query_rate: Duration,
    throttle: Option<Arc<dyn Throttle>>,
}

impl fmt::Debug for PhishNetClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhishNetClientBuilder")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("query_rate", &self.query_rate)
            .field("throttle", &self.throttle)
            .finish()
    }
}

impl PhishNetClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: PHISHNET_API_BASE.to_string(),
            timeout: None,
            query_rate: DEFAULT_QUERY_RATE,
            throttle: None,
        }
    }

    /// Set a custom base URL (useful for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Bound each HTTP call. Throttle waits are not covered.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Minimum interval between requests.
    pub fn query_rate(mut self, interval: Duration) -> Self {
        self.query_rate = interval;
        self
    }

    /// Replace the interval throttle with a custom permit source.
    pub fn throttle(mut self, throttle: impl Throttle + 'static) -> Self {
        self.throttle = Some(Arc::new(throttle));
        self
    }

    /// Build the Phish.Net client.
    pub fn build(self) -> Result<PhishNetClient> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let throttle: Arc<dyn Throttle> = match self.throttle {
            Some(throttle) => throttle,
            None => Arc::new(IntervalThrottle::new(self.query_rate)),
        };

        Ok(PhishNetClient {
            client,
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            throttle,
        })
    }
}
