// Observability hook.
//
// The client never prints. It reports three points of every call to an
// `Observer`: the request going out, the response status it classified, and
// the error it is about to return. Tokens and passwords never appear in
// events.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::classify::Operation;
use crate::error::Error;

/// A request about to be sent.
#[derive(Debug, Clone, Copy)]
pub struct RequestEvent<'a> {
    pub operation: Operation,
    pub url: &'a str,
}

/// A response that came back and was classified.
#[derive(Debug, Clone, Copy)]
pub struct ResponseEvent<'a> {
    pub operation: Operation,
    pub url: &'a str,
    pub status: StatusCode,
    pub elapsed: Duration,
    pub body_len: usize,
}

/// An error the call is returning.
#[derive(Debug, Clone, Copy)]
pub struct ErrorEvent<'a> {
    pub operation: Operation,
    pub error: &'a Error,
}

/// Caller-supplied hook invoked at well-defined points of every call.
///
/// All methods default to no-ops.
pub trait Observer: Send + Sync {
    fn request_sent(&self, _event: &RequestEvent<'_>) {}

    fn response_classified(&self, _event: &ResponseEvent<'_>) {}

    fn error_produced(&self, _event: &ErrorEvent<'_>) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Emits `tracing` events. The default observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn request_sent(&self, event: &RequestEvent<'_>) {
        debug!(method = event.operation.method(), url = event.url, "sending request");
    }

    fn response_classified(&self, event: &ResponseEvent<'_>) {
        debug!(
            method = event.operation.method(),
            url = event.url,
            status = event.status.as_u16(),
            elapsed_ms = u64::try_from(event.elapsed.as_millis()).unwrap_or(u64::MAX),
            body_len = event.body_len,
            "response received"
        );
        if event.operation == Operation::Delete && !event.status.is_success() {
            warn!(
                url = event.url,
                status = event.status.as_u16(),
                "controller answered delete with a non-success status"
            );
        }
    }

    fn error_produced(&self, event: &ErrorEvent<'_>) {
        warn!(
            method = event.operation.method(),
            status = event.error.status().map(|s| s.as_u16()),
            error = %event.error,
            "request failed"
        );
    }
}
