//! Client types for the public and member APIs.
//!
//! There is no inheritance between the two APIs: both wrap the same
//! internal [`Core`] (HTTP transport + credentials + resolved endpoints),
//! and [`MemberClient`] additionally exposes the write operations its
//! member-authenticated endpoints allow.

mod dispatcher;
mod endpoints;
mod http;
mod login;
mod search;
mod token;

pub use endpoints::{API_VERSION, Audience, Endpoints, Environment};
pub use login::LoginUrlOptions;
pub use search::{SearchMethod, SearchResults};

use std::time::Duration;

use futures_util::Stream;
use serde_json::Value;

use crate::auth::{AccessToken, Credentials, TokenGrant};
use crate::error::Error;
use crate::record::{ContentType, RecordBody};
use crate::types::{OrcidId, PutCode, PutCodes, ResourceType};
use http::HttpClient;

/// Shared capability set behind both client types.
///
/// Holds only immutable configuration; concurrent use from multiple tasks
/// is safe by construction.
#[derive(Debug, Clone)]
pub(crate) struct Core {
    pub(crate) http: HttpClient,
    pub(crate) credentials: Credentials,
    pub(crate) endpoints: Endpoints,
}

impl Core {
    fn new(credentials: Credentials, endpoints: Endpoints, timeout: Option<Duration>) -> Self {
        Self {
            http: HttpClient::new(timeout),
            credentials,
            endpoints,
        }
    }
}

macro_rules! shared_operations {
    () => {
        /// Returns the resolved endpoints this client talks to.
        pub fn endpoints(&self) -> &Endpoints {
            &self.core.endpoints
        }

        /// Build a URL for a user to login/register with ORCID.
        pub fn login_url(
            &self,
            scopes: &[&str],
            redirect_uri: &str,
            options: &LoginUrlOptions,
        ) -> String {
            self.core.login_url(scopes, redirect_uri, options)
        }

        /// Obtain a bearer token via the client-credentials grant.
        pub async fn client_credentials_token(&self, scope: &str) -> Result<AccessToken, Error> {
            self.core.client_credentials_token(scope).await
        }

        /// Exchange an OAuth2 authorization code for a full token grant.
        pub async fn token_from_authorization_code(
            &self,
            code: &str,
            redirect_uri: &str,
        ) -> Result<TokenGrant, Error> {
            self.core
                .token_from_authorization_code(code, redirect_uri)
                .await
        }

        /// Obtain a token grant by simulating a browser sign-in.
        ///
        /// Best-effort compatibility shim; prefer
        /// [`token_from_authorization_code`](Self::token_from_authorization_code)
        /// in server contexts.
        pub async fn login(
            &self,
            user_id: &str,
            password: &str,
            redirect_uri: &str,
            scope: &str,
        ) -> Result<TokenGrant, Error> {
            self.core.login(user_id, password, redirect_uri, scope).await
        }

        /// Obtain the researcher's ORCID iD via the interactive flow.
        pub async fn user_orcid(
            &self,
            user_id: &str,
            password: &str,
            redirect_uri: &str,
        ) -> Result<OrcidId, Error> {
            self.core.user_orcid(user_id, password, redirect_uri).await
        }

        /// Read a record or summary.
        ///
        /// The put-code requirement of `resource_type` is validated before
        /// any network call; violations fail with
        /// [`PutCodeUsageError`](crate::error::PutCodeUsageError).
        pub async fn read_record(
            &self,
            orcid_id: &OrcidId,
            resource_type: ResourceType,
            token: &AccessToken,
            put_code: Option<PutCodes>,
            accept: ContentType,
        ) -> Result<RecordBody, Error> {
            self.core
                .read_record(orcid_id, resource_type, token.as_str(), put_code, accept)
                .await
        }

        /// Run a single search query.
        pub async fn search(
            &self,
            query: &str,
            method: SearchMethod,
            start: Option<u32>,
            rows: Option<u32>,
            token: &AccessToken,
        ) -> Result<SearchResults, Error> {
            self.core.search(query, method, start, rows, token).await
        }

        /// Lazily yield every search result, page by page, ending at the
        /// first empty page.
        pub fn search_all<'a>(
            &'a self,
            query: &'a str,
            method: SearchMethod,
            page_size: u32,
            token: &'a AccessToken,
        ) -> impl Stream<Item = Result<Value, Error>> + 'a {
            self.core.search_all(query, method, page_size, token)
        }
    };
}

/// Client for the public API (token-only read access and search).
#[derive(Debug, Clone)]
pub struct PublicClient {
    core: Core,
}

impl PublicClient {
    /// Create a public client for the given environment.
    pub fn new(credentials: Credentials, environment: Environment) -> Self {
        Self::with_endpoints(
            credentials,
            Endpoints::resolve(environment, Audience::Public),
        )
    }

    /// Create a public client with a per-request timeout.
    pub fn with_timeout(
        credentials: Credentials,
        environment: Environment,
        timeout: Duration,
    ) -> Self {
        let endpoints = Endpoints::resolve(environment, Audience::Public);
        Self {
            core: Core::new(credentials, endpoints, Some(timeout)),
        }
    }

    /// Create a public client against explicit endpoints.
    pub fn with_endpoints(credentials: Credentials, endpoints: Endpoints) -> Self {
        Self {
            core: Core::new(credentials, endpoints, None),
        }
    }

    /// Create a public client against explicit endpoints with a
    /// per-request timeout.
    pub fn with_endpoints_and_timeout(
        credentials: Credentials,
        endpoints: Endpoints,
        timeout: Duration,
    ) -> Self {
        Self {
            core: Core::new(credentials, endpoints, Some(timeout)),
        }
    }

    shared_operations!();
}

/// Client for the member API (institution-authenticated read/write).
#[derive(Debug, Clone)]
pub struct MemberClient {
    core: Core,
}

impl MemberClient {
    /// Create a member client for the given environment.
    pub fn new(credentials: Credentials, environment: Environment) -> Self {
        Self::with_endpoints(
            credentials,
            Endpoints::resolve(environment, Audience::Member),
        )
    }

    /// Create a member client with a per-request timeout.
    pub fn with_timeout(
        credentials: Credentials,
        environment: Environment,
        timeout: Duration,
    ) -> Self {
        let endpoints = Endpoints::resolve(environment, Audience::Member);
        Self {
            core: Core::new(credentials, endpoints, Some(timeout)),
        }
    }

    /// Create a member client against explicit endpoints.
    pub fn with_endpoints(credentials: Credentials, endpoints: Endpoints) -> Self {
        Self {
            core: Core::new(credentials, endpoints, None),
        }
    }

    /// Create a member client against explicit endpoints with a
    /// per-request timeout.
    pub fn with_endpoints_and_timeout(
        credentials: Credentials,
        endpoints: Endpoints,
        timeout: Duration,
    ) -> Self {
        Self {
            core: Core::new(credentials, endpoints, Some(timeout)),
        }
    }

    shared_operations!();

    /// Add a record to a profile.
    ///
    /// Returns the new put-code when the registry communicates it via the
    /// `Location` response header; `None` means the caller must re-read
    /// the collection to discover it.
    pub async fn add_record(
        &self,
        orcid_id: &OrcidId,
        token: &AccessToken,
        resource_type: ResourceType,
        body: &RecordBody,
        content_type: ContentType,
    ) -> Result<Option<PutCode>, Error> {
        self.core
            .add_record(orcid_id, token.as_str(), resource_type, body, content_type)
            .await
    }

    /// Update an existing record; the put-code is injected into the body.
    pub async fn update_record(
        &self,
        orcid_id: &OrcidId,
        token: &AccessToken,
        resource_type: ResourceType,
        body: RecordBody,
        put_code: &PutCode,
        content_type: ContentType,
    ) -> Result<(), Error> {
        self.core
            .update_record(
                orcid_id,
                token.as_str(),
                resource_type,
                body,
                put_code,
                content_type,
            )
            .await
    }

    /// Delete a record from a profile.
    pub async fn remove_record(
        &self,
        orcid_id: &OrcidId,
        token: &AccessToken,
        resource_type: ResourceType,
        put_code: &PutCode,
    ) -> Result<(), Error> {
        self.core
            .remove_record(orcid_id, token.as_str(), resource_type, put_code)
            .await
    }
}
