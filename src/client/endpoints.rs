//! Endpoint resolution for the ORCID registry.
//!
//! A pure function of configuration: {sandbox|production} x {public|member}
//! selects the OAuth, API and interactive-login base URLs. No I/O.

use url::Url;

use crate::error::{Error, InvalidInputError};
use crate::types::{OrcidId, ResourceType};

/// API version segment shared by the record and search endpoints.
pub const API_VERSION: &str = "v2.0";

/// Production registry or the isolated sandbox environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

/// Public (token-only read access) or member (institution-authenticated
/// read/write access) request paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Audience {
    Public,
    Member,
}

/// Resolved base URLs for one environment/audience combination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    site: String,
    token_url: String,
    api_base: String,
}

impl Endpoints {
    /// Resolve the registry endpoints for an environment and audience.
    pub fn resolve(environment: Environment, audience: Audience) -> Self {
        let (site, token_url, api_base) = match (environment, audience) {
            (Environment::Production, Audience::Public) => (
                "https://orcid.org",
                "https://api.orcid.org/oauth/token",
                "https://pub.orcid.org",
            ),
            (Environment::Production, Audience::Member) => (
                "https://orcid.org",
                "https://api.orcid.org/oauth/token",
                "https://api.orcid.org",
            ),
            (Environment::Sandbox, Audience::Public) => (
                "https://sandbox.orcid.org",
                "https://api.sandbox.orcid.org/oauth/token",
                "https://pub.sandbox.orcid.org",
            ),
            (Environment::Sandbox, Audience::Member) => (
                "https://sandbox.orcid.org",
                "https://api.sandbox.orcid.org/oauth/token",
                "https://api.sandbox.orcid.org",
            ),
        };
        Self {
            site: site.to_string(),
            token_url: token_url.to_string(),
            api_base: api_base.to_string(),
        }
    }

    /// Point every endpoint at one base URL.
    ///
    /// Used for tests against a local mock server and for self-hosted
    /// proxies.
    ///
    /// # Errors
    ///
    /// The base must parse as an absolute URL; every endpoint accessor
    /// relies on that.
    pub fn for_base(base: impl AsRef<str>) -> Result<Self, Error> {
        let base = base.as_ref().trim_end_matches('/');
        Url::parse(base).map_err(|e| InvalidInputError::Other {
            message: format!("invalid base URL '{}': {}", base, e),
        })?;
        Ok(Self {
            site: base.to_string(),
            token_url: format!("{}/oauth/token", base),
            api_base: base.to_string(),
        })
    }

    /// The interactive site base (`https://orcid.org` or the sandbox).
    pub fn site(&self) -> &str {
        &self.site
    }

    /// The API base for record and search requests.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// The OAuth token endpoint used by the authorization-code grant.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// The token endpoint used by the client-credentials grant.
    ///
    /// The registry issues read tokens from the API host of the selected
    /// audience rather than the fixed token host.
    pub fn client_credentials_token_url(&self) -> String {
        format!("{}/oauth/token", self.api_base)
    }

    /// The interactive login/authorize endpoint.
    pub fn authorize_url(&self) -> String {
        format!("{}/oauth/authorize", self.site)
    }

    /// The JSON sign-in endpoint used by the interactive login shim.
    pub fn login_url(&self) -> String {
        format!("{}/oauth/custom/login.json", self.site)
    }

    /// The signout endpoint, hit first to clear any stale session.
    pub fn signout_url(&self) -> String {
        format!("{}/signout", self.site)
    }

    /// The record endpoint for one researcher and resource type.
    pub fn record_url(&self, orcid_id: &OrcidId, resource_type: ResourceType) -> String {
        format!(
            "{}/{}/{}/{}",
            self.api_base, API_VERSION, orcid_id, resource_type
        )
    }

    /// The search endpoint.
    pub fn search_url(&self) -> String {
        format!("{}/{}/search/", self.api_base, API_VERSION)
    }
}
