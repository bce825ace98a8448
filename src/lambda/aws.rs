//! AWS SDK implementation of [`Invoker`].

use std::time::Duration;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use bytes::Bytes;

use crate::config::MockConfig;
use crate::lambda::invoker::{InvokeError, Invoker};

/// Invokes functions through the Lambda `Invoke` API.
///
/// Credentials follow the standard AWS resolution chain. `endpoint_override`
/// points the client at a local Lambda emulator instead of AWS.
pub struct AwsLambdaInvoker {
    client: aws_sdk_lambda::Client,
}

impl AwsLambdaInvoker {
    pub async fn new(config: &MockConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_override {
            loader = loader.endpoint_url(endpoint);
        }
        if let Some(secs) = config.lambda.invoke_timeout_secs {
            loader = loader.timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(secs))
                    .build(),
            );
        }

        let sdk_config = loader.load().await;
        tracing::info!(
            region = ?sdk_config.region(),
            endpoint = ?config.endpoint_override,
            "Lambda client configured"
        );

        Self::from_client(aws_sdk_lambda::Client::new(&sdk_config))
    }

    pub fn from_client(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Invoker for AwsLambdaInvoker {
    async fn invoke(
        &self,
        function: &str,
        qualifier: Option<&str>,
        payload: Bytes,
        context: Bytes,
    ) -> Result<Bytes, InvokeError> {
        let client_context = String::from_utf8(context.to_vec())
            .map_err(|e| InvokeError::Transport(format!("client context is not UTF-8: {}", e)))?;

        let out = self
            .client
            .invoke()
            .function_name(function)
            .set_qualifier(qualifier.map(str::to_owned))
            .invocation_type(InvocationType::RequestResponse)
            .client_context(client_context)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|e| InvokeError::Transport(DisplayErrorContext(&e).to_string()))?;

        let bytes = out
            .payload()
            .map(|b| Bytes::copy_from_slice(b.as_ref()))
            .unwrap_or_default();

        if let Some(kind) = out.function_error() {
            return Err(InvokeError::Function {
                kind: kind.to_string(),
                payload: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes)
    }
}
