use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use favesweep_core::MediaKind;
use favesweep_engine::{
    AnalysisService, HttpAnalysisClient, HttpRemovalClient, RemovalService, ServiceError,
    ServiceSettings,
};

fn analysis_client(base_url: &str, token: Option<&str>) -> Result<HttpAnalysisClient, ServiceError> {
    HttpAnalysisClient::new(base_url, token, &ServiceSettings::default())
}

fn removal_client(base_url: &str) -> Result<HttpRemovalClient, ServiceError> {
    HttpRemovalClient::new(base_url, None, &ServiceSettings::default())
}

#[tokio::test]
async fn analysis_client_posts_identity_and_decodes_typed_entries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_json(json!({
            "id": "p1",
            "url": "https://feed.test/p1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "url": "https://cdn.test/p1.bin", "id": "p1", "type": "video" },
            { "url": "https://cdn.test/p1-thumb.bin", "id": "p1-thumb" }
        ])))
        .mount(&server)
        .await;

    let client = analysis_client(&server.uri(), None).expect("client");
    let hits = client
        .analyze("p1", "https://feed.test/p1")
        .await
        .expect("analyze ok");

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].kind, MediaKind::Video);
    assert_eq!(hits[0].id, "p1");
    assert_eq!(hits[1].kind, MediaKind::Image);
}

#[tokio::test]
async fn analysis_client_surfaces_api_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = analysis_client(&server.uri(), None).expect("client");
    let err = client.analyze("p1", "https://feed.test/p1").await.unwrap_err();

    assert_eq!(
        err,
        ServiceError::Api {
            status: 502,
            message: "bad gateway".to_string()
        }
    );
}

#[tokio::test]
async fn analysis_client_rejects_malformed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = analysis_client(&server.uri(), None).expect("client");
    let err = client.analyze("p1", "https://feed.test/p1").await.unwrap_err();

    assert!(matches!(err, ServiceError::Payload(_)));
}

#[tokio::test]
async fn analysis_token_rides_as_a_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(query_param("token", "sekret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = analysis_client(&server.uri(), Some("sekret")).expect("client");
    let hits = client
        .analyze("p1", "https://feed.test/p1")
        .await
        .expect("analyze ok");

    assert!(hits.is_empty());
}

#[tokio::test]
async fn removal_client_posts_the_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/unfavorite"))
        .and(body_json(json!({ "id": "p9" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = removal_client(&server.uri()).expect("client");
    client.remove("p9").await.expect("remove ok");
}

#[tokio::test]
async fn removal_client_surfaces_api_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/unfavorite"))
        .respond_with(ResponseTemplate::new(404).set_body_string("unknown item"))
        .mount(&server)
        .await;

    let client = removal_client(&server.uri()).expect("client");
    let err = client.remove("p9").await.unwrap_err();

    assert_eq!(
        err,
        ServiceError::Api {
            status: 404,
            message: "unknown item".to_string()
        }
    );
}

#[test]
fn clients_reject_unparseable_base_urls() {
    let err = analysis_client("not a url", None).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidUrl(_)));

    let err = removal_client("::also bad::").unwrap_err();
    assert!(matches!(err, ServiceError::InvalidUrl(_)));
}
