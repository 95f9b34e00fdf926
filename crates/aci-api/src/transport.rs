// Transport policy for every APIC request.
//
// One reqwest::Client per `ApicClient`, built here with the fixed TLS policy.
// Timeouts are applied per request so the read/write asymmetry of the
// controller API stays in one place.

use std::time::Duration;

use crate::error::Error;

/// Timeout applied to login and read requests.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after every Delete, pacing against controller rate limits.
pub const DELETE_SETTLE: Duration = Duration::from_secs(1);

/// Shared transport configuration for building HTTP clients.
///
/// Certificate verification is always off: controllers are reached through
/// self-signed or internally issued certificates. That is not configurable.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Timeout for login and Get.
    pub read_timeout: Duration,
    /// Timeout for Post and Delete. `None` leaves them unbounded.
    pub write_timeout: Option<Duration>,
    /// Fixed pause after each Delete, whatever its outcome.
    pub delete_settle: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            read_timeout: READ_TIMEOUT,
            write_timeout: None,
            delete_settle: DELETE_SETTLE,
            user_agent: concat!("aci-api/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// The client keeps no cookie store: the session token is attached
    /// explicitly on every request.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Same config with no pause after Delete.
    pub fn without_delete_settle(mut self) -> Self {
        self.delete_settle = Duration::ZERO;
        self
    }

    /// Apply `timeout` to a request builder when one is set.
    pub(crate) fn bounded(
        builder: reqwest::RequestBuilder,
        timeout: Option<Duration>,
    ) -> reqwest::RequestBuilder {
        match timeout {
            Some(t) => builder.timeout(t),
            None => builder,
        }
    }
}
