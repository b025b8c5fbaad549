use course_engine::{FailureKind, ReqwestTransport, Transport, TransportSettings};
use futures_util::StreamExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn transport_sends_configured_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .and(header("authorization", "Bearer secret-token"))
        .and(header("user-agent", "harvester-test"))
        .and(header("referer", "https://kodekloud.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"courses\": []}"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(TransportSettings {
        bearer_token: Some("secret-token".into()),
        user_agent: "harvester-test".into(),
        referer: Some("https://kodekloud.com/".into()),
        ..TransportSettings::default()
    })
    .expect("transport builds");

    let response = transport
        .get(&format!("{}/api/courses", server.uri()))
        .await
        .expect("request succeeds");
    assert!(response.is_success());
    assert_eq!(response.body, "{\"courses\": []}");
}

#[tokio::test]
async fn error_statuses_are_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(TransportSettings::default()).unwrap();
    let response = transport
        .get(&format!("{}/gone", server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status, 410);
    assert!(!response.is_success());
}

#[tokio::test]
async fn streamed_body_arrives_complete() {
    let server = MockServer::start().await;
    let payload = vec![7u8; 64 * 1024];
    Mock::given(method("GET"))
        .and(path("/media/big.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(TransportSettings::default()).unwrap();
    let mut response = transport
        .get_stream(&format!("{}/media/big.bin", server.uri()))
        .await
        .unwrap();
    assert!(response.is_success());
    assert_eq!(response.content_length, Some(payload.len() as u64));

    let mut received = Vec::new();
    while let Some(chunk) = response.body.next().await {
        received.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(received, payload);
}

#[tokio::test]
async fn malformed_url_is_rejected_before_sending() {
    let transport = ReqwestTransport::new(TransportSettings::default()).unwrap();
    let err = transport.get("not a url").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[test]
fn header_values_are_validated_at_construction() {
    let result = ReqwestTransport::new(TransportSettings {
        bearer_token: Some("bad\ntoken".into()),
        ..TransportSettings::default()
    });
    assert_eq!(result.unwrap_err().kind, FailureKind::InvalidHeader);
}
