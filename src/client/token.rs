//! OAuth2 token grants.

use tracing::{debug, instrument};

use crate::auth::{AccessToken, TokenGrant};
use crate::client::Core;
use crate::error::Error;

impl Core {
    /// Obtain a bearer token via the client-credentials grant.
    ///
    /// Typical scopes are `/read-public` and `/read-member`. Failures are
    /// surfaced as-is; the caller decides whether to retry.
    #[instrument(skip(self))]
    pub(crate) async fn client_credentials_token(&self, scope: &str) -> Result<AccessToken, Error> {
        debug!(scope, "requesting client-credentials token");
        let params = [
            ("client_id", self.credentials.key()),
            ("client_secret", self.credentials.secret()),
            ("scope", scope),
            ("grant_type", "client_credentials"),
        ];
        let grant: TokenGrant = self
            .http
            .post_form(&self.endpoints.client_credentials_token_url(), &params)
            .await?;
        Ok(grant.access_token)
    }

    /// Exchange an OAuth2 authorization code for a full token grant.
    ///
    /// Use this when a webserver serves as the redirect-URI endpoint and
    /// has retrieved the code from the redirected request.
    #[instrument(skip(self, code))]
    pub(crate) async fn token_from_authorization_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenGrant, Error> {
        debug!("exchanging authorization code");
        let params = [
            ("client_id", self.credentials.key()),
            ("client_secret", self.credentials.secret()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];
        self.http
            .post_form(self.endpoints.token_url(), &params)
            .await
    }
}
