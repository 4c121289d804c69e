//! Mock registry tests for the orcid library.
//!
//! These tests use wiremock to simulate the ORCID registry and exercise the
//! library without network access or real credentials.

use std::time::Duration;

use futures_util::StreamExt;
use orcid::error::{InvalidInputError, PutCodeUsageError, TransportError};
use orcid::{
    AccessToken, ContentType, Credentials, Endpoints, Environment, Error, LoginUrlOptions,
    MemberClient, OrcidId, PublicClient, PutCode, PutCodes, Record, RecordBody, ResourceType,
    SearchMethod,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to point a client at a mock server.
fn mock_endpoints(server: &MockServer) -> Endpoints {
    Endpoints::for_base(server.uri()).unwrap()
}

fn credentials() -> Credentials {
    Credentials::new("APP-01", "app-secret")
}

fn orcid_id() -> OrcidId {
    OrcidId::new("0000-0002-3874-0894").unwrap()
}

fn token() -> AccessToken {
    AccessToken::new("test-token")
}

fn work_json() -> serde_json::Value {
    json!({
        "title": {"title": {"value": "Collected Works"}},
        "type": "BOOK"
    })
}

// ============================================================================
// Token Tests
// ============================================================================

#[tokio::test]
async fn test_client_credentials_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=APP-01"))
        .and(body_string_contains("scope=%2Fread-public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "issued-token",
            "token_type": "bearer",
            "expires_in": 631138518,
            "scope": "/read-public"
        })))
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));
    let token = client.client_credentials_token("/read-public").await.unwrap();

    assert_eq!(token, "issued-token");
}

#[tokio::test]
async fn test_token_request_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Client not found"
        })))
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));
    let result = client.client_credentials_token("/read-public").await;

    let err = result.unwrap_err();
    match &err {
        Error::Http(http) => {
            assert_eq!(http.status, 401);
            assert!(http.is_auth_error());
        }
        other => panic!("expected HTTP error, got {other}"),
    }
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_token_from_authorization_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=4zDk4L"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "user-token",
            "token_type": "bearer",
            "orcid": "0000-0002-3874-0894",
            "name": "inspire003 inspire"
        })))
        .mount(&server)
        .await;

    let client = MemberClient::with_endpoints(credentials(), mock_endpoints(&server));
    let grant = client
        .token_from_authorization_code("4zDk4L", "https://example.org/cb")
        .await
        .unwrap();

    assert_eq!(grant.access_token, "user-token");
    assert_eq!(grant.orcid.as_deref(), Some("0000-0002-3874-0894"));
}

#[tokio::test]
async fn test_timeout_surfaces_as_transport_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "slow-token"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints_and_timeout(
        credentials(),
        mock_endpoints(&server),
        Duration::from_millis(50),
    );
    let result = client.client_credentials_token("/read-public").await;

    assert!(matches!(
        result.unwrap_err(),
        Error::Transport(TransportError::Timeout)
    ));
}

// ============================================================================
// Interactive Login Tests
// ============================================================================

#[test]
fn test_login_url_encodes_and_sorts_query() {
    let client = PublicClient::new(credentials(), Environment::Sandbox);
    let options = LoginUrlOptions {
        state: Some("state-1".to_string()),
        email: Some("ada@example.org".to_string()),
        show_login: Some(true),
        ..Default::default()
    };

    let url = client.login_url(
        &["/read-limited", "/activities/update", "/read-limited"],
        "https://example.org/cb",
        &options,
    );

    assert!(url.starts_with("https://sandbox.orcid.org/oauth/authorize?"), "{url}");
    assert!(url.contains("client_id=APP-01"), "{url}");
    assert!(url.contains("response_type=code"), "{url}");
    assert!(url.contains("scope=%2Factivities%2Fupdate+%2Fread-limited"), "{url}");
    assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.org%2Fcb"), "{url}");
    assert!(url.contains("state=state-1"), "{url}");
    assert!(url.contains("email=ada%40example.org"), "{url}");
    assert!(url.contains("show_login=true"), "{url}");
}

#[tokio::test]
async fn test_interactive_login_flow() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/signout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .and(query_param("client_id", "APP-01"))
        .and(query_param("response_type", "code"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><meta name="_csrf" content="csrf-abc"/></head></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/custom/login.json"))
        .and(header("X-CSRF-TOKEN", "csrf-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "redirectUrl": "https://example.org/cb?code=4zDk4L"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("code=4zDk4L"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "user-token",
            "orcid": "0000-0002-3874-0894"
        })))
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));
    let id = client
        .user_orcid("ada@example.org", "hunter2", "https://example.org/cb")
        .await
        .unwrap();

    assert_eq!(id.as_str(), "0000-0002-3874-0894");
}

#[tokio::test]
async fn test_interactive_login_without_csrf_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/signout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));
    let result = client
        .login("ada@example.org", "hunter2", "https://example.org/cb", "/authenticate")
        .await;

    assert!(matches!(result.unwrap_err(), Error::Auth(_)));
}

#[tokio::test]
async fn test_login_cookies_stay_within_the_flow() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/signout"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=abc123; Path=/"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><meta name="_csrf" content="csrf-abc"/></head></html>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/custom/login.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "redirectUrl": "https://example.org/cb?code=4zDk4L"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "user-token"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2.0/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [],
            "num-found": 0
        })))
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));
    client
        .login("ada@example.org", "hunter2", "https://example.org/cb", "/authenticate")
        .await
        .unwrap();
    let auth = token();
    client
        .search("family-name:Lovelace", SearchMethod::Lucene, None, None, &auth)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();

    // The session cookie travels within the login flow...
    let login_post = requests
        .iter()
        .find(|r| r.url.path() == "/oauth/custom/login.json")
        .unwrap();
    assert!(login_post.headers.contains_key("cookie"));

    // ...and never into later calls on the same client.
    let search_get = requests
        .iter()
        .find(|r| r.url.path() == "/v2.0/search/")
        .unwrap();
    assert!(!search_get.headers.contains_key("cookie"));
}

// ============================================================================
// Record Read Tests
// ============================================================================

#[tokio::test]
async fn test_read_work() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2.0/0000-0002-3874-0894/work/477441"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/orcid+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "put-code": 477441,
            "title": {"title": {"value": "Collected Works"}},
            "type": "BOOK"
        })))
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));
    let body = client
        .read_record(
            &orcid_id(),
            ResourceType::Work,
            &token(),
            Some(PutCodes::One(PutCode::new("477441").unwrap())),
            ContentType::OrcidJson,
        )
        .await
        .unwrap();

    let record = body.as_json().unwrap();
    assert_eq!(record.as_value()["type"], "BOOK");
    assert_eq!(record.put_code().unwrap().as_str(), "477441");
}

#[tokio::test]
async fn test_read_works_with_multiple_put_codes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2.0/0000-0002-3874-0894/works/477441,477442"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bulk": [
                {"work": {"put-code": 477441}},
                {"work": {"put-code": 477442}}
            ]
        })))
        .mount(&server)
        .await;

    let client = MemberClient::with_endpoints(credentials(), mock_endpoints(&server));
    let body = client
        .read_record(
            &orcid_id(),
            ResourceType::Works,
            &token(),
            Some(PutCodes::Many(vec![
                PutCode::new("477441").unwrap(),
                PutCode::new("477442").unwrap(),
            ])),
            ContentType::OrcidJson,
        )
        .await
        .unwrap();

    let record = body.as_json().unwrap();
    assert_eq!(record.as_value()["bulk"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_read_summary_without_put_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2.0/0000-0002-3874-0894/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "works": {"group": []}
        })))
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));
    let body = client
        .read_record(
            &orcid_id(),
            ResourceType::Activities,
            &token(),
            None,
            ContentType::OrcidJson,
        )
        .await
        .unwrap();

    assert!(body.as_json().is_some());
}

#[tokio::test]
async fn test_read_rejects_missing_put_code_before_any_request() {
    // No mocks mounted; a network call would fail differently.
    let server = MockServer::start().await;
    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));

    let result = client
        .read_record(
            &orcid_id(),
            ResourceType::Work,
            &token(),
            None,
            ContentType::OrcidJson,
        )
        .await;

    match result.unwrap_err() {
        Error::InvalidInput(InvalidInputError::PutCodeUsage(err)) => {
            assert!(matches!(err, PutCodeUsageError::MissingWhenRequired { .. }));
        }
        other => panic!("expected put-code usage error, got {other}"),
    }
}

#[tokio::test]
async fn test_read_record_as_xml() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2.0/0000-0002-3874-0894/work/477441"))
        .and(header("accept", "application/orcid+xml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                r#"<?xml version="1.0"?><work:work put-code="477441"><work:type>BOOK</work:type></work:work>"#,
                "application/orcid+xml",
            ),
        )
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));
    let body = client
        .read_record(
            &orcid_id(),
            ResourceType::Work,
            &token(),
            Some(PutCodes::One(PutCode::new("477441").unwrap())),
            ContentType::OrcidXml,
        )
        .await
        .unwrap();

    let document = body.as_xml().unwrap();
    assert_eq!(document.root_name(), "work:work");
}

// ============================================================================
// Record Write Tests
// ============================================================================

#[tokio::test]
async fn test_add_record_returns_put_code_from_location() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2.0/0000-0002-3874-0894/work"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", "application/orcid+json"))
        .respond_with(ResponseTemplate::new(201).insert_header(
            "Location",
            format!("{}/v2.0/0000-0002-3874-0894/work/477441", server.uri()).as_str(),
        ))
        .mount(&server)
        .await;

    let client = MemberClient::with_endpoints(credentials(), mock_endpoints(&server));
    let body = RecordBody::from(Record::new(work_json()).unwrap());
    let put_code = client
        .add_record(
            &orcid_id(),
            &token(),
            ResourceType::Work,
            &body,
            ContentType::OrcidJson,
        )
        .await
        .unwrap();

    assert_eq!(put_code.unwrap().as_str(), "477441");
}

#[tokio::test]
async fn test_add_record_without_location_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2.0/0000-0002-3874-0894/work"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let client = MemberClient::with_endpoints(credentials(), mock_endpoints(&server));
    let body = RecordBody::from(Record::new(work_json()).unwrap());
    let put_code = client
        .add_record(
            &orcid_id(),
            &token(),
            ResourceType::Work,
            &body,
            ContentType::OrcidJson,
        )
        .await
        .unwrap();

    assert!(put_code.is_none());
}

#[tokio::test]
async fn test_add_record_from_xml_template() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2.0/0000-0002-3874-0894/work"))
        .and(header("content-type", "application/orcid+xml"))
        .and(body_string_contains("<work:type>BOOK</work:type>"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let client = MemberClient::with_endpoints(credentials(), mock_endpoints(&server));
    let body =
        RecordBody::from_template(ResourceType::Work, &Record::new(work_json()).unwrap()).unwrap();
    let put_code = client
        .add_record(
            &orcid_id(),
            &token(),
            ResourceType::Work,
            &body,
            ContentType::OrcidXml,
        )
        .await
        .unwrap();

    assert!(put_code.is_none());
}

#[tokio::test]
async fn test_update_record_injects_put_code() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v2.0/0000-0002-3874-0894/work/477441"))
        .and(body_string_contains("\"put-code\":\"477441\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = MemberClient::with_endpoints(credentials(), mock_endpoints(&server));
    let body = RecordBody::from(Record::new(work_json()).unwrap());
    client
        .update_record(
            &orcid_id(),
            &token(),
            ResourceType::Work,
            body,
            &PutCode::new("477441").unwrap(),
            ContentType::OrcidJson,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_record() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v2.0/0000-0002-3874-0894/work/477441"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = MemberClient::with_endpoints(credentials(), mock_endpoints(&server));
    client
        .remove_record(
            &orcid_id(),
            &token(),
            ResourceType::Work,
            &PutCode::new("477441").unwrap(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_missing_record_surfaces_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v2.0/0000-0002-3874-0894/work/477441"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "response-code": 404,
            "developer-message": "The resource was not found."
        })))
        .mount(&server)
        .await;

    let client = MemberClient::with_endpoints(credentials(), mock_endpoints(&server));
    let result = client
        .remove_record(
            &orcid_id(),
            &token(),
            ResourceType::Work,
            &PutCode::new("477441").unwrap(),
        )
        .await;

    let err = result.unwrap_err();
    match &err {
        Error::Http(http) => assert_eq!(http.status, 404),
        other => panic!("expected HTTP error, got {other}"),
    }
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
async fn test_search_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2.0/search/"))
        .and(query_param("defType", "lucene"))
        .and(query_param("q", "family-name:Lovelace"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"orcid-identifier": {"path": "0000-0002-3874-0894"}}
            ],
            "num-found": 1
        })))
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));
    let page = client
        .search("family-name:Lovelace", SearchMethod::Lucene, None, None, &token())
        .await
        .unwrap();

    assert_eq!(page.num_found, 1);
    assert_eq!(page.result.len(), 1);
}

#[tokio::test]
async fn test_search_all_walks_pages_until_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2.0/search/"))
        .and(query_param("start", "0"))
        .and(query_param("rows", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"n": 1}, {"n": 2}],
            "num-found": 3
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2.0/search/"))
        .and(query_param("start", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"n": 3}],
            "num-found": 3
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2.0/search/"))
        .and(query_param("start", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": null,
            "num-found": 3
        })))
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));
    let auth = token();
    let results: Vec<_> = client
        .search_all("family-name:*", SearchMethod::Lucene, 2, &auth)
        .collect()
        .await;

    let values: Vec<i64> = results
        .into_iter()
        .map(|item| item.unwrap()["n"].as_i64().unwrap())
        .collect();
    assert_eq!(values, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_search_all_yields_error_and_stops() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2.0/search/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = PublicClient::with_endpoints(credentials(), mock_endpoints(&server));
    let auth = token();
    let results: Vec<_> = client
        .search_all("anything", SearchMethod::Edismax, 10, &auth)
        .collect()
        .await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_err());
}
