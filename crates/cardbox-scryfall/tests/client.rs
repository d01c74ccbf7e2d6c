//! Tests for the Scryfall client against a mock server.

use cardbox_scryfall::{Error, ScryfallClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ScryfallClient {
    ScryfallClient::builder().url(server.uri()).build()
}

#[tokio::test]
async fn fetches_a_set_by_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sets/m20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "set",
            "code": "m20",
            "name": "Core Set 2020",
            "released_at": "2019-07-12"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let set = client_for(&server).set("m20").await.unwrap();

    assert_eq!(set.code, "m20");
    assert_eq!(set.name, "Core Set 2020");
    assert_eq!(set.released_at.as_deref(), Some("2019-07-12"));
}

#[tokio::test]
async fn set_codes_are_lowercased_before_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sets/m20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "m20",
            "name": "Core Set 2020"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let set = client_for(&server).set("M20").await.unwrap();
    assert_eq!(set.code, "m20");
}

#[tokio::test]
async fn unknown_set_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sets/xyz"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "object": "error",
            "code": "not_found",
            "status": 404,
            "details": "No set found matching \"xyz\""
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).set("xyz").await.unwrap_err();

    match err {
        Error::NotFound(details) => assert!(details.contains("xyz"), "{details}"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn server_errors_surface_the_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sets"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "object": "error",
            "details": "something broke"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).sets().await.unwrap_err();
    assert!(matches!(err, Error::Api(details) if details == "something broke"));
}

#[tokio::test]
async fn fetches_the_full_set_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object": "list",
            "data": [
                {"code": "m20", "name": "Core Set 2020", "released_at": "2019-07-12"},
                {"code": "m21", "name": "Core Set 2021", "released_at": "2020-07-03"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sets = client_for(&server).sets().await.unwrap();

    assert_eq!(sets.len(), 2);
    assert_eq!(sets[1].code, "m21");
}

#[tokio::test]
async fn unreachable_host_is_connection_refused() {
    // Port 1 should refuse connections.
    let client = ScryfallClient::builder().url("http://127.0.0.1:1").build();

    let err = client.sets().await.unwrap_err();
    assert!(matches!(err, Error::ConnectionRefused));
}
