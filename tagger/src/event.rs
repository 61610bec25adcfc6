//! AWS Config compliance notifications delivered through SQS
//!
//! An SQS record body is an EventBridge envelope whose `detail` holds the
//! compliance change. Both layers are decoded separately so a failure names
//! the layer it came from.

use aws_lambda_events::event::sqs::SqsEvent;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::io::Read;

use crate::error::TaggerError;

/// Outer layer of a record body
#[derive(Deserialize, Debug)]
pub struct NotificationBody {
    pub detail: Box<RawValue>,
}

/// A resource reported by AWS Config as having changed compliance
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceEvent {
    pub resource_id: String,
    #[serde(rename = "awsRegion")]
    pub region: String,
    #[serde(rename = "awsAccountId", default)]
    pub account_id: String,
    pub resource_type: String,
    #[serde(default)]
    pub config_rule_name: String,
    #[serde(default)]
    pub new_evaluation_result: EvaluationResult,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    #[serde(default)]
    pub compliance_type: String,
}

/// Returns the body of the first record of a delivery.
///
/// Only one notification is processed per invocation; further records are
/// logged and left untouched.
pub fn first_body(event: SqsEvent) -> Result<String, TaggerError> {
    let total = event.records.len();
    let record = event.records.into_iter().next().ok_or(TaggerError::NoRecords)?;
    if total > 1 {
        tracing::warn!(ignored = total - 1, "delivery contains more than one record, only the first is processed");
    }
    match record.body {
        Some(body) => Ok(body),
        None => Err(TaggerError::MissingBody {
            message_id: record.message_id,
        }),
    }
}

/// Deserializes a `ComplianceEvent` from a string of JSON text.
///
/// # Example
///
/// ```rust
/// use compliance_tagger::event::from_str;
///
/// let event = from_str(
///     r#"{"detail":{"resourceId":"i-123","awsRegion":"us-east-1","resourceType":"AWS::EC2::Instance"}}"#,
/// )
/// .expect("valid notification");
/// assert_eq!(event.resource_id, "i-123");
/// ```
pub fn from_str(s: &str) -> Result<ComplianceEvent, TaggerError> {
    let mut de = serde_json::Deserializer::from_str(s);
    let body: NotificationBody = serde_path_to_error::deserialize(&mut de).map_err(TaggerError::Envelope)?;
    decode_detail(&body.detail)
}

/// Deserializes a `ComplianceEvent` from a `Read` impl providing JSON text.
pub fn from_reader<R>(rdr: R) -> Result<ComplianceEvent, TaggerError>
where
    R: Read,
{
    let mut de = serde_json::Deserializer::from_reader(rdr);
    let body: NotificationBody = serde_path_to_error::deserialize(&mut de).map_err(TaggerError::Envelope)?;
    decode_detail(&body.detail)
}

fn decode_detail(detail: &RawValue) -> Result<ComplianceEvent, TaggerError> {
    let mut de = serde_json::Deserializer::from_str(detail.get());
    serde_path_to_error::deserialize(&mut de).map_err(TaggerError::Event)
}
