// aci-api: Async Rust client for the Cisco APIC REST API
//
// Session login plus Get / Post / Delete against the managed-object tree,
// with the controller's mixed HTTP-status and JSON error-envelope failures
// classified into one typed error.

pub mod auth;
pub mod classify;
pub mod client;
pub mod error;
pub mod models;
pub mod observe;
pub mod query;
pub mod transport;

pub use auth::login;
pub use client::ApicClient;
pub use error::{Error, ValidationError};
pub use models::{ApicHosts, DeleteRequest, GetRequest, PostRequest, Session};
pub use observe::{NoopObserver, Observer, TracingObserver};
pub use query::QueryFilter;
pub use reqwest::StatusCode;
pub use transport::TransportConfig;
