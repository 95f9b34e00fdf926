// APIC REST client
//
// Wraps `reqwest::Client` with APIC URL construction, session cookie
// attachment, pacing delays, and response classification. Login lives in
// `auth.rs` as further inherent methods on the same type.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use url::Url;

use crate::classify::{self, JSON_MIME, Operation, RawResponse};
use crate::error::{Error, ValidationError};
use crate::models::{
    ApicHosts, DeleteRequest, GetRequest, PostRequest, REQUEST_COOKIE, Session, normalize_path,
};
use crate::observe::{ErrorEvent, Observer, RequestEvent, ResponseEvent, TracingObserver};
use crate::query::QueryFilter;
use crate::transport::TransportConfig;

/// HTTP client for the APIC REST API.
///
/// Holds no session state: every operation takes the [`Session`] it should
/// run under. Requests always go to the first entry of the host list.
/// Cheap to share behind an `Arc`; nothing inside is mutated by a call.
pub struct ApicClient {
    http: reqwest::Client,
    hosts: ApicHosts,
    transport: TransportConfig,
    observer: Arc<dyn Observer>,
}

impl ApicClient {
    /// Create a client for `hosts` using the fixed transport policy.
    pub fn new(hosts: ApicHosts, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, hosts, transport.clone()))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, hosts: ApicHosts, transport: TransportConfig) -> Self {
        Self {
            http,
            hosts,
            transport,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the default [`TracingObserver`].
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn hosts(&self) -> &ApicHosts {
        &self.hosts
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/api/{path}`, for fixed endpoints such as login.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.hosts.base_url()?;
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    /// `{base}/api/{path}.json{?filter}` for an object path.
    pub(crate) fn object_url(&self, path: &str, filter: Option<&QueryFilter>) -> Result<Url, Error> {
        let path = normalize_path(path)?;
        let query = filter.map(QueryFilter::encode).unwrap_or_default();
        self.api_url(&format!("{path}{query}"))
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Read an object path. Returns the raw response body.
    ///
    /// The request delay is applied before the call.
    pub async fn get(&self, session: &Session, req: &GetRequest) -> Result<Bytes, Error> {
        self.get_inner(session, req)
            .await
            .inspect_err(|e| self.report(Operation::Get, e))
    }

    async fn get_inner(&self, session: &Session, req: &GetRequest) -> Result<Bytes, Error> {
        require_session(session)?;
        let url = self.object_url(&req.path, Some(&req.filter))?;

        pause(req.delay).await;

        let builder = self.with_session(self.http.get(url.clone()), session);
        let builder = TransportConfig::bounded(builder, Some(self.transport.read_timeout));
        let resp = self.dispatch(Operation::Get, builder, &url).await?;

        classify::classify(Operation::Get, &resp, url.as_str())?;
        Ok(resp.body)
    }

    /// Create or update objects under a path. Returns the raw response body.
    ///
    /// The request delay is applied after a successful call only.
    pub async fn post(&self, session: &Session, req: &PostRequest) -> Result<Bytes, Error> {
        self.post_inner(session, req)
            .await
            .inspect_err(|e| self.report(Operation::Post, e))
    }

    async fn post_inner(&self, session: &Session, req: &PostRequest) -> Result<Bytes, Error> {
        require_session(session)?;
        normalize_path(&req.path)?;
        if req.payload.is_empty() {
            return Err(ValidationError::MissingPayload.into());
        }
        let url = self.object_url(&req.path, Some(&req.filter))?;

        let builder = self
            .with_session(self.http.post(url.clone()), session)
            .header(CONTENT_TYPE, JSON_MIME)
            .body(req.payload.clone());
        let builder = TransportConfig::bounded(builder, self.transport.write_timeout);
        let resp = self.dispatch(Operation::Post, builder, &url).await?;

        classify::classify(Operation::Post, &resp, url.as_str())?;
        pause(req.delay).await;
        Ok(resp.body)
    }

    /// Delete an object path.
    ///
    /// Only transport failures are errors unless the request opts into
    /// [`DeleteRequest::with_status_check`]; the status is still reported to
    /// the observer. The configured settle delay follows every call that
    /// reached the network, whatever its outcome.
    pub async fn delete(&self, session: &Session, req: &DeleteRequest) -> Result<(), Error> {
        self.delete_inner(session, req)
            .await
            .inspect_err(|e| self.report(Operation::Delete, e))
    }

    async fn delete_inner(&self, session: &Session, req: &DeleteRequest) -> Result<(), Error> {
        require_session(session)?;
        let url = self.object_url(&req.path, None)?;

        let builder = self.with_session(self.http.delete(url.clone()), session);
        let builder = TransportConfig::bounded(builder, self.transport.write_timeout);
        let result = self.dispatch(Operation::Delete, builder, &url).await;
        pause(self.transport.delete_settle).await;
        let resp = result?;

        if req.check_status {
            classify::classify(Operation::Delete, &resp, url.as_str())?;
        }
        Ok(())
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Attach the session token as the request cookie.
    fn with_session(
        &self,
        builder: reqwest::RequestBuilder,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        builder.header(COOKIE, format!("{REQUEST_COOKIE}={}", session.expose()))
    }

    /// Send, drain the body, and report both ends to the observer.
    pub(crate) async fn dispatch(
        &self,
        operation: Operation,
        builder: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<RawResponse, Error> {
        self.observer.request_sent(&RequestEvent {
            operation,
            url: url.as_str(),
        });

        let started = Instant::now();
        let resp = builder.send().await.map_err(Error::Transport)?;
        let raw = RawResponse::read(resp).await;

        self.observer.response_classified(&ResponseEvent {
            operation,
            url: url.as_str(),
            status: raw.status,
            elapsed: started.elapsed(),
            body_len: raw.body.len(),
        });
        Ok(raw)
    }

    pub(crate) fn report(&self, operation: Operation, error: &Error) {
        self.observer.error_produced(&ErrorEvent { operation, error });
    }
}

fn require_session(session: &Session) -> Result<(), ValidationError> {
    if session.is_empty() {
        Err(ValidationError::MissingToken)
    } else {
        Ok(())
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
