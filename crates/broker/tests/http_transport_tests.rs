use broker::{BrokerClient, BrokerConfig, BrokerError, HttpTransport, TransportError};
use model::{Attributes, ContextEntity, Entity};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_client(server: &MockServer) -> BrokerClient {
    let config = BrokerConfig {
        base_url: format!("{}/", server.uri()),
        ..Default::default()
    };
    BrokerClient::from_config(&config).unwrap()
}

fn ok_status() -> serde_json::Value {
    json!({ "code": "200", "reasonPhrase": "OK" })
}

// ── Request shape ───────────────────────────────────────────────

#[tokio::test]
async fn create_sends_json_body_with_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/contextEntities/type/Room/id/r1"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "attributes": [{ "name": "name", "type": "string", "value": "hall" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contextResponses": [{ "attributes": [], "statusCode": ok_status() }],
            "id": "r1",
            "isPattern": "false",
            "type": "Room"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut attrs = Attributes::new();
    attrs.add("name", "hall").unwrap();
    let entity = ContextEntity::new("Room", "r1").with_attributes(attrs);

    http_client(&server).create(&entity).await.unwrap();
}

#[tokio::test]
async fn listing_sends_limit_and_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/contextEntityTypes/Room"))
        .and(query_param("limit", "100"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contextResponses": [{
                "contextElement": {
                    "attributes": [{ "name": "floor", "type": "int", "value": "3" }],
                    "id": "r1",
                    "isPattern": "false",
                    "type": "Room"
                },
                "statusCode": ok_status()
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/contextEntityTypes/Room"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let rooms = http_client(&server)
        .list_all("Room", ContextEntity::new)
        .await
        .unwrap();

    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].attributes().get_int("floor"), Some(3));
}

// ── Status handling ─────────────────────────────────────────────

#[tokio::test]
async fn http_error_status_is_not_special_cased() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/contextEntities/type/Room/id/r9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "404",
            "reasonPhrase": "No context element found"
        })))
        .mount(&server)
        .await;

    let err = http_client(&server)
        .delete(&ContextEntity::new("Room", "r9"))
        .await
        .unwrap_err();

    assert!(matches!(err, BrokerError::OperationFailed { code: 404, .. }));
}

#[tokio::test]
async fn non_json_body_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>502 Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = http_client(&server)
        .delete(&ContextEntity::new("Room", "r1"))
        .await
        .unwrap_err();

    assert!(matches!(err, BrokerError::Transport(TransportError::Body(_))));
}

#[tokio::test]
async fn json_of_the_wrong_shape_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "contextElement": "r1",
            "statusCode": ok_status()
        })))
        .mount(&server)
        .await;

    let mut entity = ContextEntity::new("Room", "r1");
    let err = http_client(&server).read(&mut entity).await.unwrap_err();

    assert!(matches!(err, BrokerError::Decode(_)));
    assert!(entity.attributes().is_empty());
}

// ── Transport failure ───────────────────────────────────────────

#[tokio::test]
async fn unreachable_broker_is_a_transport_error_and_absent() {
    let transport = HttpTransport::from_client(reqwest::Client::new());
    let client = BrokerClient::new("http://127.0.0.1:1", transport);

    assert!(!client.exists("Room", "r1").await);
    let err = client
        .delete(&ContextEntity::new("Room", "r1"))
        .await
        .unwrap_err();
    assert!(matches!(err, BrokerError::Transport(_)));
}
