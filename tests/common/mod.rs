//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alb_mock::config::{MockConfig, TargetDefinition, TargetMap};
use alb_mock::http::IncomingRequest;
use alb_mock::lambda::{InvokeError, Invoker};
use alb_mock::routing::RouteTable;
use alb_mock::{Dispatcher, HttpServer, Shutdown};
use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use axum::response::Response;
use bytes::Bytes;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub function: String,
    pub qualifier: Option<String>,
    pub payload: Value,
    pub context: Bytes,
}

type Responder = Box<dyn Fn(&Call) -> Result<Bytes, InvokeError> + Send + Sync>;

/// Programmable in-process stand-in for the Lambda service.
pub struct MockInvoker {
    calls: Mutex<Vec<Call>>,
    responder: Responder,
    delay: Option<Duration>,
}

impl MockInvoker {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&Call) -> Result<Bytes, InvokeError> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
            delay: None,
        }
    }

    /// Always return the given reply document.
    pub fn replying(reply: Value) -> Self {
        let bytes = Bytes::from(serde_json::to_vec(&reply).unwrap());
        Self::new(move |_| Ok(bytes.clone()))
    }

    /// Reply 200 with the received event as a JSON body.
    pub fn echo() -> Self {
        Self::new(|call| {
            let reply = json!({
                "statusCode": 200,
                "headers": { "content-type": "application/json" },
                "body": call.payload.to_string(),
                "isBase64Encoded": false,
            });
            Ok(Bytes::from(serde_json::to_vec(&reply).unwrap()))
        })
    }

    /// Fail every call with a transport error.
    pub fn failing(message: &'static str) -> Self {
        Self::new(move |_| Err(InvokeError::Transport(message.to_string())))
    }

    /// Return raw bytes regardless of input.
    pub fn raw(bytes: &'static [u8]) -> Self {
        Self::new(move |_| Ok(Bytes::from_static(bytes)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Invoker for MockInvoker {
    async fn invoke(
        &self,
        function: &str,
        qualifier: Option<&str>,
        payload: Bytes,
        context: Bytes,
    ) -> Result<Bytes, InvokeError> {
        let call = Call {
            function: function.to_string(),
            qualifier: qualifier.map(str::to_string),
            payload: serde_json::from_slice(&payload).unwrap(),
            context,
        };
        self.calls.lock().unwrap().push(call.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(&call)
    }
}

/// Build a config from `(route key, target)` pairs in order.
pub fn config_with(targets: Vec<(&str, TargetDefinition)>) -> MockConfig {
    MockConfig {
        targets: targets.into_iter().collect::<TargetMap>(),
        ..MockConfig::default()
    }
}

pub fn dispatcher(config: &MockConfig, invoker: Arc<MockInvoker>) -> Dispatcher {
    let routes = RouteTable::build(&config.targets).unwrap();
    Dispatcher::new(routes, invoker, config.region.clone())
}

pub fn request(method: Method, uri: &str, headers: &[(&str, &str)], body: &[u8]) -> IncomingRequest {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    IncomingRequest::new(method, uri.parse().unwrap(), map, Bytes::copy_from_slice(body))
}

pub async fn body_bytes(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn start_server(config: MockConfig, invoker: Arc<MockInvoker>) -> TestServer {
    let server = HttpServer::new(&config, dispatcher(&config, invoker));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
