#![allow(clippy::unwrap_used)]
// Integration tests for `ApicClient` against a wiremock controller.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aci_api::observe::{ErrorEvent, RequestEvent, ResponseEvent};
use aci_api::{
    ApicClient, ApicHosts, DeleteRequest, Error, GetRequest, Observer, PostRequest, QueryFilter,
    Session, TransportConfig, ValidationError,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApicClient) {
    let server = MockServer::start().await;
    let client = ApicClient::new(
        ApicHosts::single(server.uri()),
        &TransportConfig::default().without_delete_settle(),
    )
    .unwrap();
    (server, client)
}

fn session() -> Session {
    Session::new("tok-123")
}

fn password(p: &str) -> SecretString {
    p.to_string().into()
}

fn error_envelope(text: &str) -> serde_json::Value {
    json!({
        "totalCount": "1",
        "imdata": [{ "error": { "attributes": { "code": "107", "text": text } } }]
    })
}

/// Mount a catch-all that fails the test if anything reaches the server.
async fn forbid_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_cookie_value() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .and(body_json(json!({
            "aaaUser": { "attributes": { "name": "admin", "pwd": "s3cret" } }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "APIC-cookie=abc123; path=/; HttpOnly")
                .set_body_json(json!({ "totalCount": "1", "imdata": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = client.login("admin", &password("s3cret")).await.unwrap();
    assert_eq!(session.expose(), "abc123");
}

#[tokio::test]
async fn test_login_free_function() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", "APIC-cookie=xyz; path=/"),
        )
        .mount(&server)
        .await;

    let session = aci_api::login(&server.uri(), "admin", &password("pw"))
        .await
        .unwrap();
    assert_eq!(session.expose(), "xyz");
}

#[tokio::test]
async fn test_login_success_without_cookie_is_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "imdata": [] })))
        .mount(&server)
        .await;

    let result = client.login("admin", &password("s3cret")).await;
    assert!(
        matches!(result, Err(Error::MissingSessionCookie { .. })),
        "expected MissingSessionCookie, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_ignores_differently_cased_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", "APIC-Cookie=abc123; path=/"),
        )
        .mount(&server)
        .await;

    let result = client.login("admin", &password("s3cret")).await;
    assert!(matches!(result, Err(Error::MissingSessionCookie { .. })));
}

#[tokio::test]
async fn test_login_rejected_surfaces_controller_text() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_envelope(
            "Username or password is incorrect - FAILED local authentication",
        )))
        .mount(&server)
        .await;

    let err = client.login("admin", &password("wrong")).await.unwrap_err();
    assert!(err.is_auth_rejected(), "got: {err:?}");
    assert!(
        err.to_string().contains("FAILED local authentication"),
        "got: {err}"
    );
}

#[tokio::test]
async fn test_login_malformed_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "imdata": [] })))
        .mount(&server)
        .await;

    let err = client.login("admin", &password("pw")).await.unwrap_err();
    assert!(
        matches!(err, Error::MalformedPayload { status, .. } if status == StatusCode::BAD_REQUEST),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_login_server_error_includes_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
        .mount(&server)
        .await;

    let err = client.login("admin", &password("pw")).await.unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, Error::UnexpectedStatus { .. }), "got: {err:?}");
    assert!(msg.contains("maintenance window"), "got: {msg}");
    assert!(msg.contains("/api/aaaLogin.json"), "got: {msg}");
}

// ── Get ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_sends_cookie_and_filter() {
    let (server, client) = setup().await;

    let body = json!({ "totalCount": "1", "imdata": [{ "fvTenant": { "attributes": { "name": "TEN_A" } } }] });

    Mock::given(method("GET"))
        .and(path("/api/class/fvTenant.json"))
        .and(header("cookie", "APIC-Cookie=tok-123"))
        .and(query_param("query-target-filter", r#"wcard(fvTenant.name, "TEN_.*")"#))
        .and(query_param("rsp-prop-include", "naming-only"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let req = GetRequest::new("class/fvTenant").with_filter(
        QueryFilter::new()
            .query_target_filter(r#"wcard(fvTenant.name, "TEN_.*")"#)
            .rsp_prop_include("naming-only"),
    );
    let bytes = client.get(&session(), &req).await.unwrap();

    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed, body);
}

#[tokio::test]
async fn test_get_returns_empty_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mo/uni/tn-A.json"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let bytes = client
        .get(&session(), &GetRequest::new("mo/uni/tn-A.json"))
        .await
        .unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_get_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_envelope("Token was invalid")))
        .mount(&server)
        .await;

    let err = client
        .get(&session(), &GetRequest::new("class/fvTenant"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Authentication { detail: None, .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_get_client_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client
        .get(&session(), &GetRequest::new("mo/uni/tn-missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ClientRequest { .. }), "got: {err:?}");
    assert!(err.to_string().contains("404 Not Found"));
}

#[tokio::test]
async fn test_get_gateway_timeout() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(504))
        .mount(&server)
        .await;

    let err = client
        .get(&session(), &GetRequest::new("class/fvTenant"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::GatewayTimeout { .. }), "got: {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_get_server_error_catch_all() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client
        .get(&session(), &GetRequest::new("class/fvTenant"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedStatus { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_get_applies_delay_before_call() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let started = Instant::now();
    client
        .get(
            &session(),
            &GetRequest::new("class/fvTenant").with_delay(Duration::from_millis(60)),
        )
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(60));
}

// ── Post ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_post_sends_payload_verbatim() {
    let (server, client) = setup().await;

    let payload = json!({
        "fvTenant": {
            "attributes": { "name": "TEN_TF_TEST", "descr": "managed" },
            "children": [{ "tagInst": { "attributes": { "name": "terraform" } } }]
        }
    });

    Mock::given(method("POST"))
        .and(path("/api/mo/uni.json"))
        .and(query_param("rsp-subtree", "modified"))
        .and(header("cookie", "APIC-Cookie=tok-123"))
        .and(header("content-type", "application/json"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "imdata": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let req = PostRequest::json("mo/uni", &payload)
        .unwrap()
        .with_filter(QueryFilter::new().rsp_subtree("modified"));
    let bytes = client.post(&session(), &req).await.unwrap();
    assert!(!bytes.is_empty());
}

#[tokio::test]
async fn test_post_bad_request_with_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "imdata": [{ "error": { "attributes": { "text": "bad request" } } }]
        })))
        .mount(&server)
        .await;

    let err = client
        .post(&session(), &PostRequest::new("mo/uni", r#"{"fvTenant":{}}"#))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ClientRequest { .. }), "got: {err:?}");
    assert!(err.to_string().contains("bad request"), "got: {err}");
}

#[tokio::test]
async fn test_post_bad_request_missing_imdata() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "totalCount": "0" })))
        .mount(&server)
        .await;

    let err = client
        .post(&session(), &PostRequest::new("mo/uni", r#"{"fvTenant":{}}"#))
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::MalformedPayload { status, .. } if status == StatusCode::BAD_REQUEST),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_post_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client
        .post(&session(), &PostRequest::new("mo/uni", "{}"))
        .await
        .unwrap_err();
    assert!(err.is_auth_rejected(), "got: {err:?}");
}

#[tokio::test]
async fn test_post_delay_follows_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "imdata": [] })))
        .mount(&server)
        .await;

    let started = Instant::now();
    client
        .post(
            &session(),
            &PostRequest::new("mo/uni", "{}").with_delay(Duration::from_millis(300)),
        )
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_post_delay_skipped_on_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_envelope("bad dn")))
        .mount(&server)
        .await;

    let started = Instant::now();
    let err = client
        .post(
            &session(),
            &PostRequest::new("mo/uni", "{}").with_delay(Duration::from_secs(5)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ClientRequest { .. }), "got: {err:?}");
    assert!(started.elapsed() < Duration::from_secs(5));
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_success() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/mo/uni/tn-TEN_TF_TEST.json"))
        .and(header("cookie", "APIC-Cookie=tok-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .delete(&session(), &DeleteRequest::new("mo/uni/tn-TEN_TF_TEST"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_is_lenient_by_default() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_envelope("cannot delete")))
        .mount(&server)
        .await;

    let result = client
        .delete(&session(), &DeleteRequest::new("mo/uni/tn-A"))
        .await;
    assert!(result.is_ok(), "got: {result:?}");
}

#[tokio::test]
async fn test_delete_with_status_check() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client
        .delete(&session(), &DeleteRequest::new("mo/uni/tn-A").with_status_check())
        .await
        .unwrap_err();
    assert!(err.is_auth_rejected(), "got: {err:?}");
}

#[tokio::test]
async fn test_delete_settles_after_call() {
    let server = MockServer::start().await;
    let mut transport = TransportConfig::default();
    transport.delete_settle = Duration::from_millis(80);
    let client = ApicClient::new(ApicHosts::single(server.uri()), &transport).unwrap();

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let started = Instant::now();
    client
        .delete(&session(), &DeleteRequest::new("mo/uni/tn-A"))
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(80));
}

#[tokio::test]
async fn test_delete_settles_after_transport_error() {
    let mut transport = TransportConfig::default();
    transport.delete_settle = Duration::from_millis(300);
    // Nothing listens on port 1.
    let client = ApicClient::new(ApicHosts::single("http://127.0.0.1:1"), &transport).unwrap();

    let started = Instant::now();
    let err = client
        .delete(&session(), &DeleteRequest::new("mo/uni/tn-A"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert!(started.elapsed() >= Duration::from_millis(300));
}

// ── Pre-flight validation ───────────────────────────────────────────

#[tokio::test]
async fn test_xml_paths_never_reach_the_network() {
    let (server, client) = setup().await;
    forbid_requests(&server).await;

    let path = "mo/uni/tn-A.xml";
    let get = client.get(&session(), &GetRequest::new(path)).await;
    let post = client.post(&session(), &PostRequest::new(path, "{}")).await;
    let delete = client.delete(&session(), &DeleteRequest::new(path)).await;

    for result in [get.map(|_| ()), post.map(|_| ()), delete] {
        assert!(
            matches!(
                result,
                Err(Error::Validation(ValidationError::XmlNotSupported { .. }))
            ),
            "got: {result:?}"
        );
    }
}

#[tokio::test]
async fn test_reserved_path_characters_never_reach_the_network() {
    let (server, client) = setup().await;
    forbid_requests(&server).await;

    let filter = QueryFilter::new().rsp_subtree("full");
    for path in ["class/fvTenant#x", "class/fvTenant?query-target=children"] {
        let get = client
            .get(&session(), &GetRequest::new(path).with_filter(filter.clone()))
            .await;
        let post = client.post(&session(), &PostRequest::new(path, "{}")).await;
        let delete = client.delete(&session(), &DeleteRequest::new(path)).await;

        for result in [get.map(|_| ()), post.map(|_| ()), delete] {
            assert!(
                matches!(
                    result,
                    Err(Error::Validation(ValidationError::ReservedCharacter { .. }))
                ),
                "{path}: got {result:?}"
            );
        }
    }
}

#[tokio::test]
async fn test_empty_token_never_reaches_the_network() {
    let (server, client) = setup().await;
    forbid_requests(&server).await;

    let empty = Session::new("");
    for path in ["class/fvTenant", "mo/uni.json", "mo/uni/tn-A/BD-web"] {
        let get = client.get(&empty, &GetRequest::new(path)).await;
        let post = client.post(&empty, &PostRequest::new(path, "{}")).await;
        let delete = client.delete(&empty, &DeleteRequest::new(path)).await;

        for result in [get.map(|_| ()), post.map(|_| ()), delete] {
            assert!(
                matches!(result, Err(Error::Validation(ValidationError::MissingToken))),
                "{path}: got {result:?}"
            );
        }
    }
}

#[tokio::test]
async fn test_missing_path_and_payload() {
    let (server, client) = setup().await;
    forbid_requests(&server).await;

    let err = client.get(&session(), &GetRequest::new("")).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::MissingPath)));

    let err = client
        .post(&session(), &PostRequest::new("mo/uni", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::MissingPayload)));
}

#[tokio::test]
async fn test_missing_host() {
    let client = ApicClient::new(ApicHosts::default(), &TransportConfig::default()).unwrap();

    let err = client.login("admin", &password("pw")).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::MissingHost)));
}

// ── Observer ────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl Recorder {
    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }
}

impl Observer for Recorder {
    fn request_sent(&self, event: &RequestEvent<'_>) {
        self.push(format!("sent {}", event.operation.method()));
    }

    fn response_classified(&self, event: &ResponseEvent<'_>) {
        self.push(format!("status {}", event.status.as_u16()));
    }

    fn error_produced(&self, event: &ErrorEvent<'_>) {
        self.push(format!("error {:?}", event.error.status().map(|s| s.as_u16())));
    }
}

#[tokio::test]
async fn test_observer_sees_each_stage() {
    let (server, client) = setup().await;
    let recorder = Arc::new(Recorder::default());
    let client = client.with_observer(recorder.clone());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(504))
        .mount(&server)
        .await;

    let _ = client
        .get(&session(), &GetRequest::new("class/fvTenant"))
        .await;

    let seen = recorder.0.lock().unwrap().clone();
    assert_eq!(seen, vec!["sent GET", "status 504", "error Some(504)"]);
}

#[tokio::test]
async fn test_observer_sees_validation_errors_only() {
    let (_server, client) = setup().await;
    let recorder = Arc::new(Recorder::default());
    let client = client.with_observer(recorder.clone());

    let _ = client.get(&Session::new(""), &GetRequest::new("x")).await;

    let seen = recorder.0.lock().unwrap().clone();
    assert_eq!(seen, vec!["error None"]);
}

// ── Live controller ─────────────────────────────────────────────────

/// Runs against a real controller when `ACI_APIC`, `ACI_APIC_USERNAME` and
/// `ACI_APIC_PASSWORD` are set: `cargo test -- --ignored`.
#[tokio::test]
#[ignore = "requires a reachable APIC"]
async fn test_live_login_and_read_tenants() {
    let (Ok(host), Ok(user), Ok(pass)) = (
        std::env::var("ACI_APIC"),
        std::env::var("ACI_APIC_USERNAME"),
        std::env::var("ACI_APIC_PASSWORD"),
    ) else {
        return;
    };

    let client = ApicClient::new(ApicHosts::single(host), &TransportConfig::default()).unwrap();
    let session = client.login(&user, &password(&pass)).await.unwrap();
    assert!(!session.is_empty());

    let req = GetRequest::new("class/fvTenant")
        .with_filter(QueryFilter::new().rsp_prop_include("naming-only"));
    let body = client.get(&session, &req).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(parsed.get("imdata").is_some());
}
