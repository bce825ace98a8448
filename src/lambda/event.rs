//! ALB target group wire types.
//!
//! These mirror the JSON an Application Load Balancer hands to a Lambda
//! target and expects back. Only single-value headers and query parameters
//! are modelled.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Invocation event sent to the function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbTargetGroupRequest {
    pub request_context: AlbRequestContext,

    pub http_method: String,

    /// Request path with the matched prefix stripped; never empty.
    pub path: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default)]
    pub query_string_parameters: BTreeMap<String, String>,

    /// Present only for POST, PUT and PATCH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbRequestContext {
    pub elb: ElbContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElbContext {
    pub target_group_arn: String,
}

impl AlbRequestContext {
    /// Synthesize a stable target group ARN for a route key.
    pub fn for_target(region: Option<&str>, route_key: &str) -> Self {
        let region = region.unwrap_or(DEFAULT_REGION);
        let target_group_arn = format!(
            "arn:aws:elasticloadbalancing:{}:{}:targetgroup/{}/{:016x}",
            region,
            MOCK_ACCOUNT_ID,
            route_key,
            fnv1a(route_key.as_bytes()),
        );
        Self {
            elb: ElbContext { target_group_arn },
        }
    }
}

const DEFAULT_REGION: &str = "us-east-1";
const MOCK_ACCOUNT_ID: &str = "123456789012";

// FNV-1a keeps the ARN suffix stable across runs and platforms.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325_u64, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Reply returned by the function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbTargetGroupResponse {
    pub status_code: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// `null` is accepted and read as an empty body.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,

    #[serde(default)]
    pub is_base64_encoded: bool,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
