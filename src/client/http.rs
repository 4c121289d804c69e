//! HTTP transport wrapper.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use crate::error::{Error, HttpError};
use crate::record::ContentType;

/// Thin wrapper around [`reqwest::Client`] with the request shapes the
/// registry expects and centralized non-2xx handling.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Create a new HTTP client with an optional per-request timeout.
    ///
    /// The client keeps no state between calls; in particular it has no
    /// cookie jar.
    pub(crate) fn new(timeout: Option<Duration>) -> Self {
        let client = builder(timeout).build().expect("failed to build HTTP client");
        Self { client, timeout }
    }

    /// One-shot client with its own cookie jar for the interactive login
    /// flow, which spans several requests in one browser-like session.
    ///
    /// The jar lives only as long as the flow; nothing persists into later
    /// calls or into concurrent flows.
    pub(crate) fn session(&self) -> reqwest::Client {
        builder(self.timeout)
            .cookie_store(true)
            .build()
            .expect("failed to build HTTP client")
    }

    /// GET a record body as raw bytes.
    #[instrument(skip(self, token))]
    pub(crate) async fn get_record(
        &self,
        url: &str,
        accept: ContentType,
        token: &str,
    ) -> Result<Vec<u8>, Error> {
        debug!(url, "record read");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept.as_mime())
            .bearer_auth(token)
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// GET a JSON response with query parameters and bearer auth.
    #[instrument(skip(self, query, token))]
    pub(crate) async fn get_json<R>(
        &self,
        url: &str,
        query: &[(&str, String)],
        token: &str,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        debug!(url, "JSON query");
        trace!(?query, "query parameters");
        let response = self
            .client
            .get(url)
            .query(query)
            .header(ACCEPT, "application/orcid+json")
            .bearer_auth(token)
            .send()
            .await?;
        Ok(check(response).await?.json::<R>().await?)
    }

    /// POST a form-encoded body, expecting a JSON response.
    #[instrument(skip(self, params))]
    pub(crate) async fn post_form<R>(&self, url: &str, params: &[(&str, &str)]) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        debug!(url, "form POST");
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .form(params)
            .send()
            .await?;
        Ok(check(response).await?.json::<R>().await?)
    }

    /// Send a serialized record body with the given verb.
    ///
    /// Returns the checked response so the caller can read headers
    /// (the created put-code travels in `Location`).
    #[instrument(skip(self, body, token))]
    pub(crate) async fn write_record(
        &self,
        method: Method,
        url: &str,
        body: Vec<u8>,
        content_type: ContentType,
        token: &str,
    ) -> Result<reqwest::Response, Error> {
        debug!(url, %method, "record write");
        let response = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, content_type.as_mime())
            .header(ACCEPT, ContentType::OrcidJson.as_mime())
            .bearer_auth(token)
            .body(body)
            .send()
            .await?;
        check(response).await
    }

    /// DELETE with bearer auth and no body.
    #[instrument(skip(self, token))]
    pub(crate) async fn delete(&self, url: &str, token: &str) -> Result<(), Error> {
        debug!(url, "record delete");
        let response = self.client.delete(url).bearer_auth(token).send().await?;
        check(response).await?;
        Ok(())
    }
}

fn builder(timeout: Option<Duration>) -> reqwest::ClientBuilder {
    let mut builder =
        reqwest::Client::builder().user_agent(concat!("orcid/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
}

/// Turn any non-2xx response into an [`HttpError`] carrying the status and
/// raw body.
pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    trace!(status = %status, "response");
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(HttpError::new(status.as_u16(), body).into())
    }
}
