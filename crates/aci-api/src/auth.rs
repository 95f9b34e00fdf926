// APIC session login
//
// Exchanges a username/password for the `APIC-cookie` session token. The
// token is returned to the caller; nothing is stored on the client, and
// there is no logout call.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::classify::{self, Operation};
use crate::client::ApicClient;
use crate::error::Error;
use crate::models::{ApicHosts, LOGIN_COOKIE, Session};
use crate::transport::TransportConfig;

/// Fixed login path under `/api/`.
pub const LOGIN_PATH: &str = "aaaLogin.json";

impl ApicClient {
    /// Authenticate against the primary host and return the session token.
    ///
    /// A 2xx without an `APIC-cookie` is still a failure. No retry.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, Error> {
        self.login_inner(username, password)
            .await
            .inspect_err(|e| self.report(Operation::Login, e))
    }

    async fn login_inner(&self, username: &str, password: &SecretString) -> Result<Session, Error> {
        let url = self.api_url(LOGIN_PATH)?;
        debug!(user = username, "logging in at {}", url);

        let body = json!({
            "aaaUser": {
                "attributes": {
                    "name": username,
                    "pwd": password.expose_secret(),
                }
            }
        });

        let builder = self.http().post(url.clone()).json(&body);
        let builder = TransportConfig::bounded(builder, Some(self.transport().read_timeout));
        let resp = self.dispatch(Operation::Login, builder, &url).await?;

        classify::classify(Operation::Login, &resp, url.as_str())?;

        match resp.cookie(LOGIN_COOKIE) {
            Some(token) if !token.is_empty() => {
                debug!("login successful");
                Ok(Session::new(token))
            }
            _ => Err(Error::MissingSessionCookie {
                url: url.to_string(),
            }),
        }
    }
}

/// One-shot login against `host` with the default transport policy.
pub async fn login(host: &str, username: &str, password: &SecretString) -> Result<Session, Error> {
    let client = ApicClient::new(ApicHosts::single(host), &TransportConfig::default())?;
    client.login(username, password).await
}
