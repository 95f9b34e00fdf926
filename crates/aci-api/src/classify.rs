// Response classification shared by login and the object operations.
//
// The controller reports request-level failures inside a JSON body of the
// shape `{"imdata":[{"error":{"attributes":{"code":"...","text":"..."}}}]}`,
// but only some operations and statuses carry it. Everything here is pure
// over (status, content-type, body) so the rules are testable without a
// server.

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::error::Error;

pub const JSON_MIME: &str = "application/json";

/// The generic binary type a missing `Content-Type` is assumed to be.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Which call a response belongs to. Each applies slightly different rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Get,
    Post,
    Delete,
}

impl Operation {
    pub fn method(self) -> &'static str {
        match self {
            Self::Login | Self::Post => "POST",
            Self::Get => "GET",
            Self::Delete => "DELETE",
        }
    }
}

/// A response reduced to the parts classification looks at.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    /// `(name, value)` of every `Set-Cookie` on the response.
    pub cookies: Vec<(String, String)>,
    pub body: Bytes,
}

impl RawResponse {
    /// Drain a `reqwest::Response`.
    ///
    /// A body that fails to read is treated as empty: 2xx with no body is a
    /// valid controller answer, and failure paths only use it for detail.
    pub async fn read(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let cookies = resp
            .cookies()
            .map(|c| (c.name().to_owned(), c.value().to_owned()))
            .collect();
        let body = resp.bytes().await.unwrap_or_default();
        Self {
            status,
            content_type,
            cookies,
            body,
        }
    }

    /// Value of the named response cookie. Names match case-sensitively.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_json(&self) -> bool {
        has_content_type(self.content_type.as_deref(), JSON_MIME)
    }
}

// ── Content type ─────────────────────────────────────────────────────

/// Whether a `Content-Type` header value names `mimetype`.
///
/// An absent or empty header only matches [`DEFAULT_MIME`]. The header may
/// list several comma-separated types; parameters after `;` are ignored.
/// Scanning stops at the first entry that is not a `type/subtype`.
pub fn has_content_type(content_type: Option<&str>, mimetype: &str) -> bool {
    let content_type = match content_type.map(str::trim) {
        Some(ct) if !ct.is_empty() => ct,
        _ => return mimetype == DEFAULT_MIME,
    };

    for entry in content_type.split(',') {
        let media_type = entry.split(';').next().unwrap_or_default().trim();
        let Some((kind, subtype)) = media_type.split_once('/') else {
            break;
        };
        if kind.is_empty() || subtype.is_empty() {
            break;
        }
        if media_type.eq_ignore_ascii_case(mimetype) {
            return true;
        }
    }
    false
}

// ── Error envelope ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorEnvelope {
    imdata: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct ImdataEntry {
    error: FaultObject,
}

#[derive(Deserialize)]
struct FaultObject {
    attributes: FaultAttributes,
}

#[derive(Deserialize)]
struct FaultAttributes {
    text: String,
}

/// Extract `imdata[0].error.attributes.text` from a controller body.
///
/// `None` for anything that is not JSON or does not have exactly that shape.
pub fn controller_error_text(body: &[u8]) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_slice(body).ok()?;
    let first = envelope.imdata.into_iter().next()?;
    let entry: ImdataEntry = serde_json::from_value(first).ok()?;
    Some(entry.error.attributes.text)
}

/// Detail for a 4xx whose body may carry the envelope.
///
/// `Ok(None)` when the body is not JSON at all, `Err` when it claims JSON
/// but the envelope does not match.
fn envelope_detail(resp: &RawResponse, url: &str) -> Result<Option<String>, Error> {
    if !resp.is_json() {
        return Ok(None);
    }
    controller_error_text(&resp.body)
        .map(Some)
        .ok_or_else(|| Error::MalformedPayload {
            status: resp.status,
            url: url.to_owned(),
        })
}

// ── Status rules ─────────────────────────────────────────────────────

/// Turn a non-success response into its error. `Ok(())` for 2xx.
///
/// Delete is classified with the Get rules; callers that keep the lenient
/// Delete behavior skip this call.
pub fn classify(op: Operation, resp: &RawResponse, url: &str) -> Result<(), Error> {
    let status = resp.status;
    if status.is_success() {
        return Ok(());
    }

    match op {
        Operation::Login => classify_login(resp, url),
        Operation::Post if status == StatusCode::BAD_REQUEST => Err(Error::ClientRequest {
            status,
            detail: envelope_detail(resp, url)?,
            url: url.to_owned(),
        }),
        Operation::Get | Operation::Post | Operation::Delete => Err(classify_object(status, url)),
    }
}

fn classify_login(resp: &RawResponse, url: &str) -> Result<(), Error> {
    let status = resp.status;
    if !status.is_client_error() {
        return Err(Error::UnexpectedStatus {
            status,
            body: Some(String::from_utf8_lossy(&resp.body).into_owned()),
            url: url.to_owned(),
        });
    }

    let detail = envelope_detail(resp, url)?;
    Err(if status == StatusCode::UNAUTHORIZED {
        Error::Authentication {
            detail,
            url: url.to_owned(),
        }
    } else {
        Error::ClientRequest {
            status,
            detail,
            url: url.to_owned(),
        }
    })
}

fn classify_object(status: StatusCode, url: &str) -> Error {
    let url = url.to_owned();
    if status == StatusCode::UNAUTHORIZED {
        Error::Authentication { detail: None, url }
    } else if status.is_client_error() {
        Error::ClientRequest {
            status,
            detail: None,
            url,
        }
    } else if status == StatusCode::GATEWAY_TIMEOUT {
        Error::GatewayTimeout { status, url }
    } else {
        Error::UnexpectedStatus {
            status,
            body: None,
            url,
        }
    }
}
