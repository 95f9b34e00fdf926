// Request-side data model: controller endpoints, the session token, and the
// per-call request values for Get / Post / Delete.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};

use crate::error::ValidationError;
use crate::query::QueryFilter;

/// Name of the cookie carrying the token on the login response.
pub const LOGIN_COOKIE: &str = "APIC-cookie";

/// Name of the cookie sent back on every subsequent request.
///
/// Casing differs from [`LOGIN_COOKIE`]; both are kept literally.
pub const REQUEST_COOKIE: &str = "APIC-Cookie";

// ── Endpoints ───────────────────────────────────────────────────────

/// Ordered addresses of a controller cluster.
///
/// Only the first entry is used. An entry is either a bare `host[:port]`,
/// reached over HTTPS, or a full `http://` / `https://` base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApicHosts(Vec<String>);

impl ApicHosts {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            hosts
                .into_iter()
                .map(|h| {
                    let h: String = h.into();
                    h.trim().to_owned()
                })
                .filter(|h| !h.is_empty())
                .collect(),
        )
    }

    pub fn single(host: impl Into<String>) -> Self {
        Self::new([host.into()])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The address every request goes to.
    pub fn primary(&self) -> Result<&str, ValidationError> {
        self.0
            .first()
            .map(String::as_str)
            .ok_or(ValidationError::MissingHost)
    }

    /// `scheme://host[:port]` for the primary address, with no trailing slash.
    pub fn base_url(&self) -> Result<String, ValidationError> {
        Ok(base_url_for(self.primary()?))
    }
}

impl From<Vec<String>> for ApicHosts {
    fn from(hosts: Vec<String>) -> Self {
        Self::new(hosts)
    }
}

pub(crate) fn base_url_for(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("https://") || host.starts_with("http://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    }
}

// ── Session ─────────────────────────────────────────────────────────

/// Opaque token issued by the controller at login.
///
/// No expiry is tracked; it is valid until the controller answers 401.
#[derive(Clone)]
pub struct Session(SecretString);

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token value.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session([REDACTED])")
    }
}

impl From<SecretString> for Session {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Normalize an object path for dispatch.
///
/// Rejects `.xml` and the URL delimiters `?` / `#`, appends `.json` when
/// missing, and drops leading slashes.
pub fn normalize_path(path: &str) -> Result<String, ValidationError> {
    let trimmed = path.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(ValidationError::MissingPath);
    }
    if let Some(character) = trimmed.chars().find(|c| matches!(c, '?' | '#')) {
        return Err(ValidationError::ReservedCharacter {
            path: path.to_owned(),
            character,
        });
    }
    if trimmed.ends_with(".xml") {
        return Err(ValidationError::XmlNotSupported {
            path: path.to_owned(),
        });
    }
    if trimmed.ends_with(".json") {
        Ok(trimmed.to_owned())
    } else {
        Ok(format!("{trimmed}.json"))
    }
}

// ── Requests ────────────────────────────────────────────────────────

/// A read of one object path.
#[derive(Debug, Clone, Default)]
pub struct GetRequest {
    pub path: String,
    pub filter: QueryFilter,
    /// Pause before the request is sent.
    pub delay: Duration,
}

impl GetRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A create/update of one object path.
#[derive(Debug, Clone, Default)]
pub struct PostRequest {
    pub path: String,
    pub filter: QueryFilter,
    /// Raw JSON body, sent verbatim.
    pub payload: Bytes,
    /// Pause after a successful request.
    pub delay: Duration,
}

impl PostRequest {
    pub fn new(path: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            payload: payload.into(),
            ..Self::default()
        }
    }

    /// Build from any serializable value.
    pub fn json(path: impl Into<String>, body: &impl serde::Serialize) -> serde_json::Result<Self> {
        Ok(Self::new(path, serde_json::to_vec(body)?))
    }

    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A delete of one object path. Query filters do not apply.
#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub path: String,
    /// Classify non-2xx statuses like a Get instead of only failing on
    /// transport errors.
    pub check_status: bool,
}

impl DeleteRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            check_status: false,
        }
    }

    pub fn with_status_check(mut self) -> Self {
        self.check_status = true;
        self
    }
}
