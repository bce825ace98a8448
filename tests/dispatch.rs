//! Dispatcher behaviour end to end, without a network listener.

use std::collections::BTreeMap;
use std::sync::Arc;

use alb_mock::config::TargetDefinition;
use alb_mock::http::response::NO_MATCH_MESSAGE;
use alb_mock::http::IncomingRequest;
use alb_mock::lambda::{ClientContext, InvokeError};
use axum::http::{header, Method, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

mod common;
use common::{body_bytes, body_json, config_with, dispatcher, request, MockInvoker};

#[tokio::test]
async fn liveness_probe_bypasses_routing() {
    let invoker = Arc::new(MockInvoker::echo());
    let config = config_with(vec![("users", TargetDefinition::new("users-fn"))]);
    let dispatcher = dispatcher(&config, invoker.clone());

    let response = dispatcher.handle(request(Method::GET, "/", &[], b"")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());
    assert!(invoker.calls().is_empty());
}

#[tokio::test]
async fn liveness_probe_works_without_targets() {
    let invoker = Arc::new(MockInvoker::echo());
    let dispatcher = dispatcher(&config_with(vec![]), invoker);

    let response = dispatcher.handle(request(Method::GET, "/", &[], b"")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unmatched_path_is_400_with_fixed_body() {
    let invoker = Arc::new(MockInvoker::echo());
    let config = config_with(vec![("users", TargetDefinition::new("users-fn"))]);
    let dispatcher = dispatcher(&config, invoker.clone());

    for (method, path) in [(Method::GET, "/orders"), (Method::POST, "/"), (Method::DELETE, "/user")] {
        let response = dispatcher.handle(request(method, path, &[], b"")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_json(response).await, json!({ "error": NO_MATCH_MESSAGE }));
    }
    assert!(invoker.calls().is_empty());
}

#[tokio::test]
async fn matched_request_becomes_alb_event() {
    let invoker = Arc::new(MockInvoker::echo());
    let config = config_with(vec![(
        "svc",
        TargetDefinition::new("svc-fn").with_qualifier("live"),
    )]);
    let dispatcher = dispatcher(&config, invoker.clone());

    let response = dispatcher
        .handle(request(
            Method::POST,
            "/svc/foo/bar?page=2&page=3",
            &[("content-type", "application/json"), ("x-tenant", "acme")],
            br#"{"a":1}"#,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let calls = invoker.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.function, "svc-fn");
    assert_eq!(call.qualifier.as_deref(), Some("live"));
    assert_eq!(&call.context[..], b"e30=");

    let event = &call.payload;
    assert_eq!(event["httpMethod"], "POST");
    assert_eq!(event["path"], "/foo/bar");
    assert_eq!(event["headers"]["x-tenant"], "acme");
    assert_eq!(event["queryStringParameters"]["page"], "3");
    assert_eq!(event["body"], r#"{"a":1}"#);
    assert_eq!(event["isBase64Encoded"], false);
    assert!(event["requestContext"]["elb"]["targetGroupArn"]
        .as_str()
        .unwrap()
        .contains(":targetgroup/svc/"));

    // The echo reply carries the event back as the response body.
    assert_eq!(&body_json(response).await, event);
}

#[tokio::test]
async fn qualifier_is_omitted_when_unset() {
    let invoker = Arc::new(MockInvoker::echo());
    let config = config_with(vec![("svc", TargetDefinition::new("svc-fn"))]);
    let dispatcher = dispatcher(&config, invoker.clone());

    dispatcher.handle(request(Method::GET, "/svc", &[], b"")).await;
    let call = &invoker.calls()[0];
    assert_eq!(call.qualifier, None);
    assert_eq!(call.payload["path"], "/");
    assert!(call.payload.get("body").is_none());
}

#[tokio::test]
async fn binary_body_is_base64_encoded() {
    let invoker = Arc::new(MockInvoker::echo());
    let config = config_with(vec![("svc", TargetDefinition::new("svc-fn"))]);
    let dispatcher = dispatcher(&config, invoker.clone());

    dispatcher
        .handle(request(
            Method::PUT,
            "/svc/upload",
            &[("content-type", "application/octet-stream")],
            br#"{"a":1}"#,
        ))
        .await;

    let event = &invoker.calls()[0].payload;
    assert_eq!(event["isBase64Encoded"], true);
    assert_eq!(event["body"], STANDARD.encode(br#"{"a":1}"#));
}

#[tokio::test]
async fn first_declared_target_wins() {
    let invoker = Arc::new(MockInvoker::echo());
    let config = config_with(vec![
        ("a", TargetDefinition::new("a-fn").with_prefix("/a")),
        ("ab", TargetDefinition::new("ab-fn").with_prefix("/ab")),
    ]);
    let dispatcher = dispatcher(&config, invoker.clone());

    dispatcher.handle(request(Method::GET, "/ab/x", &[], b"")).await;
    let call = &invoker.calls()[0];
    assert_eq!(call.function, "a-fn");
    assert_eq!(call.payload["path"], "b/x");
}

#[tokio::test]
async fn binary_reply_is_decoded() {
    let invoker = Arc::new(MockInvoker::replying(json!({
        "statusCode": 200,
        "body": STANDARD.encode([0u8, 1, 2, 255]),
        "isBase64Encoded": true,
    })));
    let config = config_with(vec![("svc", TargetDefinition::new("svc-fn"))]);
    let dispatcher = dispatcher(&config, invoker);

    let response = dispatcher.handle(request(Method::GET, "/svc/img", &[], b"")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    assert_eq!(&body_bytes(response).await[..], &[0u8, 1, 2, 255]);
}

#[tokio::test]
async fn reply_status_and_headers_are_copied() {
    let invoker = Arc::new(MockInvoker::replying(json!({
        "statusCode": 418,
        "statusDescription": "418 I'm a teapot",
        "headers": { "content-type": "text/plain", "x-brew": "earl-grey" },
        "body": "short and stout",
        "isBase64Encoded": false,
    })));
    let config = config_with(vec![("tea", TargetDefinition::new("tea-fn"))]);
    let dispatcher = dispatcher(&config, invoker);

    let response = dispatcher.handle(request(Method::GET, "/tea", &[], b"")).await;
    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(response.headers()["x-brew"], "earl-grey");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(&body_bytes(response).await[..], b"short and stout");
}

#[tokio::test]
async fn invocation_error_is_503_naming_function() {
    let invoker = Arc::new(MockInvoker::failing("connection refused"));
    let config = config_with(vec![("svc", TargetDefinition::new("svc-fn"))]);
    let dispatcher = dispatcher(&config, invoker);

    let response = dispatcher.handle(request(Method::GET, "/svc", &[], b"")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Target lambda 'svc-fn' invocation error:\nconnection refused" })
    );
}

#[tokio::test]
async fn function_error_is_503() {
    let invoker = Arc::new(MockInvoker::new(|_| {
        Err(InvokeError::Function {
            kind: "Unhandled".into(),
            payload: r#"{"errorMessage":"boom"}"#.into(),
        })
    }));
    let config = config_with(vec![("svc", TargetDefinition::new("svc-fn"))]);
    let dispatcher = dispatcher(&config, invoker);

    let response = dispatcher.handle(request(Method::GET, "/svc", &[], b"")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let message = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(message.starts_with("Target lambda 'svc-fn' invocation error:\n"));
    assert!(message.contains("Unhandled"));
    assert!(message.contains("boom"));
}

#[tokio::test]
async fn unparseable_result_is_503() {
    let config = config_with(vec![("svc", TargetDefinition::new("svc-fn"))]);

    for raw in [&b"not json"[..], br#"{"body":"missing status"}"#, br#"{"statusCode":99999}"#] {
        let invoker = Arc::new(MockInvoker::raw(raw));
        let dispatcher = dispatcher(&config, invoker);
        let response = dispatcher.handle(request(Method::GET, "/svc", &[], b"")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("'svc-fn'"));
    }
}

#[tokio::test]
async fn undecodable_plain_body_is_503() {
    let invoker = Arc::new(MockInvoker::echo());
    let config = config_with(vec![("svc", TargetDefinition::new("svc-fn"))]);
    let dispatcher = dispatcher(&config, invoker.clone());

    let response = dispatcher
        .handle(request(
            Method::POST,
            "/svc",
            &[("content-type", "text/plain")],
            &[0xff, 0xfe, 0xfd],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(invoker.calls().is_empty());
}

#[tokio::test]
async fn repeated_requests_dispatch_identically() {
    let invoker = Arc::new(MockInvoker::echo());
    let config = config_with(vec![
        ("users", TargetDefinition::new("users-fn")),
        ("orders", TargetDefinition::new("orders-fn").with_prefix("/api/orders")),
    ]);
    let dispatcher = dispatcher(&config, invoker.clone());

    for _ in 0..3 {
        let response = dispatcher
            .handle(request(
                Method::PATCH,
                "/api/orders/9?expand=items",
                &[("content-type", "application/json")],
                br#"{"qty":2}"#,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let calls = invoker.calls();
    assert_eq!(calls.len(), 3);
    for call in &calls[1..] {
        assert_eq!(call.function, calls[0].function);
        assert_eq!(call.payload, calls[0].payload);
        assert_eq!(call.context, calls[0].context);
    }
}

#[tokio::test]
async fn custom_client_context_reaches_invoker() {
    let invoker = Arc::new(MockInvoker::echo());
    let config = config_with(vec![("svc", TargetDefinition::new("svc-fn"))]);
    let context = ClientContext {
        custom: Some(BTreeMap::from([("tenant".to_string(), "acme".to_string())])),
        ..ClientContext::default()
    };
    let dispatcher = dispatcher(&config, invoker.clone()).with_client_context(context);

    dispatcher.handle(request(Method::GET, "/svc", &[], b"")).await;

    let call = &invoker.calls()[0];
    let decoded: Value = serde_json::from_slice(&STANDARD.decode(&call.context).unwrap()).unwrap();
    assert_eq!(decoded, json!({ "custom": { "tenant": "acme" } }));
}

#[tokio::test]
async fn null_reply_body_is_empty() {
    let invoker = Arc::new(MockInvoker::replying(json!({
        "statusCode": 204,
        "body": null,
    })));
    let config = config_with(vec![("svc", TargetDefinition::new("svc-fn"))]);
    let dispatcher = dispatcher(&config, invoker);

    let response = dispatcher.handle(request(Method::DELETE, "/svc/1", &[], b"")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());
}

fn unreadable(method: Method, uri: &str) -> IncomingRequest {
    let (parts, _) = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(())
        .unwrap()
        .into_parts();
    IncomingRequest::unreadable(parts, "connection reset by peer")
}

#[tokio::test]
async fn unreadable_body_is_503_naming_function() {
    let invoker = Arc::new(MockInvoker::echo());
    let config = config_with(vec![("svc", TargetDefinition::new("svc-fn"))]);
    let dispatcher = dispatcher(&config, invoker.clone());

    let response = dispatcher.handle(unreadable(Method::POST, "/svc/orders")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_json(response).await,
        json!({
            "error": "Target lambda 'svc-fn' invocation error:\nfailed to read request body: connection reset by peer"
        })
    );
    assert!(invoker.calls().is_empty());
}

#[tokio::test]
async fn unreadable_body_on_unmatched_path_is_400() {
    let invoker = Arc::new(MockInvoker::echo());
    let config = config_with(vec![("svc", TargetDefinition::new("svc-fn"))]);
    let dispatcher = dispatcher(&config, invoker);

    let response = dispatcher.handle(unreadable(Method::PUT, "/other")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": NO_MATCH_MESSAGE }));
}
