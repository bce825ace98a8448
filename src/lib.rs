//! ALB → Lambda emulator library.
//!
//! Accepts arbitrary HTTP requests, turns each into the event an Application
//! Load Balancer would send to a Lambda target, invokes the function and turns
//! its reply back into an HTTP response.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lambda;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::MockConfig;
pub use dispatch::Dispatcher;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
