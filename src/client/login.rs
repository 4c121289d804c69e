//! Interactive login support.
//!
//! The browser-facing half of the registry has no stable API contract:
//! [`Core::login`] drives a simulated sign-in session (fetch the page,
//! scrape the CSRF token, post credentials, follow the redirect). It is a
//! best-effort compatibility shim; server contexts should prefer
//! [`Core::token_from_authorization_code`].

use std::collections::BTreeSet;

use regex::Regex;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use crate::auth::TokenGrant;
use crate::client::Core;
use crate::client::http::check;
use crate::error::{AuthError, Error};
use crate::types::OrcidId;

/// Optional parameters for the login/registration URL.
///
/// Mirrors the fields the registry's authorize page accepts for
/// pre-filling the sign-in or registration form.
#[derive(Debug, Clone, Default)]
pub struct LoginUrlOptions {
    /// Arbitrary CSRF-prevention token, echoed back on redirect.
    pub state: Option<String>,
    /// Pre-fill for the registration form.
    pub family_names: Option<String>,
    /// Pre-fill for the registration form.
    pub given_names: Option<String>,
    /// Pre-fill for the sign-in or registration form.
    pub email: Option<String>,
    /// Display language of the authorization page.
    pub lang: Option<String>,
    /// Show the sign-in form by default instead of registration.
    pub show_login: Option<bool>,
}

impl Core {
    /// Build a URL for a user to login/register with ORCID.
    ///
    /// Scopes are deduplicated, sorted and space-joined.
    pub(crate) fn login_url(
        &self,
        scopes: &[&str],
        redirect_uri: &str,
        options: &LoginUrlOptions,
    ) -> String {
        let scope = join_scopes(scopes);
        let mut url =
            Url::parse(&self.endpoints.authorize_url()).expect("authorize URL is well-formed");

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", self.credentials.key());
            query.append_pair("scope", &scope);
            query.append_pair("response_type", "code");
            query.append_pair("redirect_uri", redirect_uri);
            if let Some(state) = &options.state {
                query.append_pair("state", state);
            }
            if let Some(family_names) = &options.family_names {
                query.append_pair("family_names", family_names);
            }
            if let Some(given_names) = &options.given_names {
                query.append_pair("given_names", given_names);
            }
            if let Some(email) = &options.email {
                query.append_pair("email", email);
            }
            if let Some(lang) = &options.lang {
                query.append_pair("lang", lang);
            }
            if let Some(show_login) = options.show_login {
                query.append_pair("show_login", if show_login { "true" } else { "false" });
            }
        }

        url.to_string()
    }

    /// Obtain a token grant by simulating a browser sign-in.
    #[instrument(skip(self, password))]
    pub(crate) async fn login(
        &self,
        user_id: &str,
        password: &str,
        redirect_uri: &str,
        scope: &str,
    ) -> Result<TokenGrant, Error> {
        // One cookie jar per flow; concurrent logins never see each
        // other's session.
        let http = self.http.session();

        // Clear any stale session cookie; the status does not matter.
        debug!("starting interactive login session");
        http.get(self.endpoints.signout_url()).send().await?;

        let authorize = http
            .get(self.endpoints.authorize_url())
            .query(&[
                ("client_id", self.credentials.key()),
                ("response_type", "code"),
                ("scope", scope),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await?;
        let page = check(authorize).await?.text().await?;
        let csrf = find_csrf(&page).ok_or(AuthError::CsrfNotFound)?;

        debug!("posting credentials");
        let body = json!({
            "userName": user_id,
            "password": password,
            "approved": true,
            "persistentTokenEnabled": true,
            "redirectUrl": null,
        });
        let response = http
            .post(self.endpoints.login_url())
            .header("X-CSRF-TOKEN", csrf)
            .header(reqwest::header::ORIGIN, self.endpoints.site())
            .json(&body)
            .send()
            .await?;
        let login: Value = check(response).await?.json().await?;

        let redirect = login
            .get("redirectUrl")
            .and_then(Value::as_str)
            .ok_or(AuthError::AuthorizationCodeNotFound)?;
        let code =
            authorization_code_from(redirect).ok_or(AuthError::AuthorizationCodeNotFound)?;

        self.token_from_authorization_code(&code, redirect_uri).await
    }

    /// Obtain the researcher's ORCID iD via the interactive flow.
    pub(crate) async fn user_orcid(
        &self,
        user_id: &str,
        password: &str,
        redirect_uri: &str,
    ) -> Result<OrcidId, Error> {
        let grant = self
            .login(user_id, password, redirect_uri, "/authenticate")
            .await?;
        let orcid = grant
            .orcid
            .ok_or(AuthError::MissingTokenField { field: "orcid" })?;
        OrcidId::new(orcid)
    }
}

fn join_scopes(scopes: &[&str]) -> String {
    let set: BTreeSet<&str> = scopes.iter().copied().collect();
    set.into_iter().collect::<Vec<_>>().join(" ")
}

/// Locate the CSRF token in the sign-in page HTML.
///
/// The page embeds it as `<meta name="_csrf" content="...">`; attribute
/// order is not guaranteed.
fn find_csrf(page: &str) -> Option<String> {
    let name_first = Regex::new(r#"<meta[^>]*name="_csrf"[^>]*content="([^"]+)""#)
        .expect("static regex is valid");
    let content_first = Regex::new(r#"<meta[^>]*content="([^"]+)"[^>]*name="_csrf""#)
        .expect("static regex is valid");

    name_first
        .captures(page)
        .or_else(|| content_first.captures(page))
        .map(|captures| captures[1].to_string())
}

/// Pull the authorization code from the redirect URL's query string.
fn authorization_code_from(redirect: &str) -> Option<String> {
    let url = Url::parse(redirect).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
}
