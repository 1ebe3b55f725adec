//! Integration tests for the generic verb client: argument handling,
//! precedence of explicit options, and response/error mapping against a live
//! mock server.

use gridslice_client::{
    Arg, CallArgs, CallData, ClientConfig, Error, ErrorCode, GridsliceClient, RequestOptions,
    ResponseValue,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> GridsliceClient {
    GridsliceClient::new(&ClientConfig::with_host(server.uri())).unwrap()
}

#[tokio::test]
async fn get_with_empty_endpoint_fails_before_any_request() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;

    let err = client.client().get("", ()).await.unwrap_err();
    assert_eq!(err.to_string(), "endpoint must not be empty");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn every_verb_rejects_an_empty_endpoint() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    let raw = client.client();

    assert!(matches!(raw.get("", ()).await, Err(Error::Validation { .. })));
    assert!(matches!(raw.post("", ()).await, Err(Error::Validation { .. })));
    assert!(matches!(raw.put("", ()).await, Err(Error::Validation { .. })));
    assert!(matches!(raw.delete("", ()).await, Err(Error::Validation { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn too_many_arguments_fail_before_any_request() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;

    let args = CallArgs(vec![
        Arg::Data(CallData::Value(json!("hello"))),
        Arg::Options(RequestOptions::default()),
        Arg::Options(RequestOptions::default()),
    ]);
    let err = client.client().get("/hi", args).await.unwrap_err();
    assert_eq!(err.to_string(), "Too many arguments passed to client");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_resolves_with_the_decoded_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "example": "hello" })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let value = client.client().get("/hello", ()).await.unwrap();
    assert_eq!(value, ResponseValue::Json(json!({ "example": "hello" })));
}

#[tokio::test]
async fn get_data_becomes_the_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .and(query_param("hello", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "example": "hello" })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let value = client
        .client()
        .get("/hello", json!({ "hello": true }))
        .await
        .unwrap();
    assert_eq!(value.into_value(), json!({ "example": "hello" }));
}

#[tokio::test]
async fn get_with_query_headers_and_raw_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .and(query_param("hello", "true"))
        .and(header("Some-Header", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"example":"hello"}"#))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let options = RequestOptions::default()
        .parse_json(false)
        .with_headers([("Some-Header".to_string(), "yes".to_string())].into());
    let value = client
        .client()
        .get("/hello", (json!({ "hello": true }), options))
        .await
        .unwrap();
    // json: false passes the body through verbatim.
    assert_eq!(value, ResponseValue::Text(r#"{"example":"hello"}"#.to_string()));
}

#[tokio::test]
async fn post_object_data_is_sent_as_a_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hello"))
        .and(body_json(json!({ "hello": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "example": "hello" })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let value = client
        .client()
        .post("/hello", json!({ "hello": true }))
        .await
        .unwrap();
    assert_eq!(value.into_value(), json!({ "example": "hello" }));
}

#[tokio::test]
async fn post_options_bag_with_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hello"))
        .and(body_json(json!({ "hello": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "example": "hello" })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let value = client
        .client()
        .post("/hello", RequestOptions::json_body(json!({ "hello": true })))
        .await
        .unwrap();
    assert_eq!(value.into_value(), json!({ "example": "hello" }));
}

#[tokio::test]
async fn post_string_data_is_sent_and_received_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hello"))
        .and(body_string("hello"))
        .respond_with(ResponseTemplate::new(200).set_body_string("response-hello"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let value = client.client().post("/hello", json!("hello")).await.unwrap();
    assert_eq!(value, ResponseValue::Text("response-hello".to_string()));
}

#[tokio::test]
async fn explicit_json_false_overrides_the_derived_json_body() {
    // A plain object was passed, but the overlay says json: false — the
    // literal text must go over the wire, not a re-encoded JSON document.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/x"))
        .and(body_string(r#"{"a":1}"#))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let value = client
        .client()
        .post(
            "/x",
            (json!({ "a": 1 }), RequestOptions::default().parse_json(false)),
        )
        .await
        .unwrap();
    assert_eq!(value, ResponseValue::Text("ok".to_string()));
}

#[tokio::test]
async fn put_data_behaves_like_post_data() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/hello"))
        .and(body_json(json!({ "hello": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "example": "hello" })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let value = client
        .client()
        .put("/hello", json!({ "hello": true }))
        .await
        .unwrap();
    assert_eq!(value.into_value(), json!({ "example": "hello" }));
}

#[tokio::test]
async fn delete_with_a_204_resolves_to_a_non_null_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/hello"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let value = client.client().delete("/hello", ()).await.unwrap();
    assert_eq!(value.into_value(), json!(""));
}

#[tokio::test]
async fn delete_with_query_options() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/hello"))
        .and(query_param("hello", "true"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let options =
        RequestOptions::query([("hello".to_string(), "true".to_string())].into());
    let value = client.client().delete("/hello", options).await.unwrap();
    assert_eq!(value.into_value(), json!(""));
}

#[tokio::test]
async fn identifying_headers_are_sent_with_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .and(header("Accept", "application/json"))
        .and(header("User-Agent", "GridSlice Client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.client().get("/hello", ()).await.unwrap();
}

#[tokio::test]
async fn string_error_bodies_become_the_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(ResponseTemplate::new(400).set_body_string("No job was posted"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.client().get("/hello", ()).await.unwrap_err();
    assert_eq!(err.to_string(), "No job was posted");
    assert_eq!(err.code(), Some(&ErrorCode::Status(400)));
    assert_eq!(err.code(), err.error_code());
}

#[tokio::test]
async fn structured_error_bodies_are_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": 1234,
            "message": "internal failure"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.client().get("/hello", ()).await.unwrap_err();
    assert_eq!(err.to_string(), "internal failure");
    assert_eq!(err.code(), Some(&ErrorCode::Value(json!(1234))));
}

#[tokio::test]
async fn empty_error_bodies_fall_back_to_the_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.client().get("/missing", ()).await.unwrap_err();
    assert_eq!(err.to_string(), "Not Found");
    assert_eq!(err.code(), Some(&ErrorCode::Status(404)));
}

#[tokio::test]
async fn transport_failures_surface_as_transport_errors() {
    // Point at a server that is not there.
    let client =
        GridsliceClient::new(&ClientConfig::with_host("http://127.0.0.1:1")).unwrap();
    let err = client.client().get("/hello", ()).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn an_invalid_host_fails_at_construction() {
    let err = GridsliceClient::new(&ClientConfig::with_host("not a url")).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}
