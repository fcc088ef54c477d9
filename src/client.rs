use std::fmt;

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::{
    retry::{retry_with_backoff, RetryState},
    ClientOptions, HttpResponse, HuddleError, RequestDescriptor, Result,
};

#[derive(Clone)]
/// HTTP client bound to one service origin, with timeout and bounded
/// exponential-backoff retry.
pub struct ResilientClient {
    http: reqwest::Client,
    base_url: Url,
    options: ClientOptions,
}

impl fmt::Debug for ResilientClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientClient")
            .field("base_url", &self.base_url.as_str())
            .field("options", &self.options)
            .finish()
    }
}

impl ResilientClient {
    /// Creates a client for `base_url` with default options.
    ///
    /// All request paths are resolved relative to this origin.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Creates a client sharing an existing `reqwest` connection pool.
    pub fn with_http(http: reqwest::Client, base_url: impl AsRef<str>) -> Result<Self> {
        let raw = base_url.as_ref().trim();
        let base_url = Url::parse(raw)
            .map_err(|err| HuddleError::InvalidRequest(format!("invalid base url '{raw}': {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(HuddleError::InvalidRequest(format!(
                "base url '{raw}' cannot carry request paths"
            )));
        }
        Ok(Self {
            http,
            base_url,
            options: ClientOptions::default(),
        })
    }

    /// Creates a client whose origin is read from environment variable `var`.
    ///
    /// Returns an error if the variable is missing, empty or not a URL.
    pub fn from_env(var: &str) -> std::result::Result<Self, String> {
        let url = std::env::var(var).map_err(|_| format!("missing {var} environment variable"))?;
        if url.trim().is_empty() {
            return Err(format!("{var} is set but empty"));
        }
        Self::new(url).map_err(|err| err.to_string())
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Sends `request`, retrying transient and 5xx failures.
    ///
    /// Returns the 2xx response untouched, or the error of the final
    /// attempt once the retry budget is spent.
    pub async fn send(&self, request: &RequestDescriptor) -> Result<HttpResponse> {
        let mut state = RetryState::new();
        self.send_tracked(request, &mut state).await
    }

    /// Like [`ResilientClient::send`], with a caller-owned retry state.
    pub async fn send_tracked(
        &self,
        request: &RequestDescriptor,
        state: &mut RetryState,
    ) -> Result<HttpResponse> {
        let policy = self.options.retry_policy();
        retry_with_backoff(&policy, state, HuddleError::failure_class, || {
            self.attempt(request)
        })
        .await
    }

    /// Sends `request` and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, request: &RequestDescriptor) -> Result<T> {
        self.send(request).await?.json()
    }

    async fn attempt(&self, request: &RequestDescriptor) -> Result<HttpResponse> {
        let url = request.resolve(&self.base_url)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(method = %request.method(), %url, "sending request");

        let builder = self
            .http
            .request(request.method().clone(), url)
            .timeout(self.options.timeout());
        let response = request
            .apply(builder)?
            .send()
            .await
            .map_err(HuddleError::Transport)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(HuddleError::Transport)?;

        if !status.is_success() {
            return Err(HuddleError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
