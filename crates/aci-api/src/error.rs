use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error type for the `aci-api` crate.
///
/// Every failure an operation can end in lands in exactly one variant, so
/// callers can branch on the kind of failure instead of matching on message
/// text. The `Display` output is the human-readable form and embeds the HTTP
/// status line plus the controller's own error text when it was recoverable.
#[derive(Debug, Error)]
pub enum Error {
    // ── Pre-flight ──────────────────────────────────────────────────
    /// Required input missing or in a disallowed format. Raised before any
    /// request is built.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL assembled from the endpoint, path and filter did not parse.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Authentication ──────────────────────────────────────────────
    /// HTTP 401: the controller rejected the session token or credentials.
    #[error("APIC rejected credentials for this request [401 Unauthorized]{}", detail_suffix(.detail.as_deref()))]
    Authentication { detail: Option<String>, url: String },

    /// Login returned 2xx but no `APIC-cookie` was issued.
    #[error("APIC login returned 2xx but did not issue an APIC-cookie ({url})")]
    MissingSessionCookie { url: String },

    // ── Controller responses ────────────────────────────────────────
    /// Any 4xx other than 401.
    #[error("APIC response with client error: [{status}]{}", detail_suffix(.detail.as_deref()))]
    ClientRequest {
        status: StatusCode,
        detail: Option<String>,
        url: String,
    },

    /// HTTP 504 from the controller or a gateway in front of it.
    #[error("APIC connection gateway timeout: [{status}]")]
    GatewayTimeout { status: StatusCode, url: String },

    /// Any other status outside 200-299.
    #[error("APIC REST error: [{status}] ({url}){}", body_suffix(.body.as_deref()))]
    UnexpectedStatus {
        status: StatusCode,
        body: Option<String>,
        url: String,
    },

    /// Response claimed JSON but did not carry the `imdata[0].error.attributes.text`
    /// envelope.
    #[error("APIC request failed with status code: {} with malformed response payload", .status.as_u16())]
    MalformedPayload { status: StatusCode, url: String },
}

/// Input problems caught before anything goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No APIC cookie provided")]
    MissingToken,

    #[error("No URI path provided")]
    MissingPath,

    #[error("No payload provided")]
    MissingPayload,

    #[error("No APIC host provided")]
    MissingHost,

    #[error("XML format requested for '{path}', only JSON is supported")]
    XmlNotSupported { path: String },

    /// `?` or `#` would end the path early; filters go through `QueryFilter`.
    #[error("Object path '{path}' contains reserved character '{character}'")]
    ReservedCharacter { path: String, character: char },
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map(|d| format!(" - [{d}]")).unwrap_or_default()
}

fn body_suffix(body: Option<&str>) -> String {
    match body {
        Some(b) if !b.is_empty() => format!(": {b}"),
        _ => String::new(),
    }
}

impl Error {
    /// Returns `true` if the controller rejected the token or credentials.
    ///
    /// A fresh login may resolve this; retrying the same request will not.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient condition worth retrying later.
    ///
    /// This crate never retries on its own.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::GatewayTimeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the call failed before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The HTTP status that produced this error, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Authentication { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::ClientRequest { status, .. }
            | Self::GatewayTimeout { status, .. }
            | Self::UnexpectedStatus { status, .. }
            | Self::MalformedPayload { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// The controller's own diagnostic text, when it could be recovered
    /// from the response body.
    pub fn controller_text(&self) -> Option<&str> {
        match self {
            Self::Authentication { detail, .. } | Self::ClientRequest { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }

    /// The request URL this error belongs to, if the request got that far.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Authentication { url, .. }
            | Self::MissingSessionCookie { url }
            | Self::ClientRequest { url, .. }
            | Self::GatewayTimeout { url, .. }
            | Self::UnexpectedStatus { url, .. }
            | Self::MalformedPayload { url, .. } => Some(url),
            Self::Transport(e) => e.url().map(url::Url::as_str),
            _ => None,
        }
    }
}
