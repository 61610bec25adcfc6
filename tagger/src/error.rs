//! Error types

use std::{collections::HashMap, fmt};

use crate::tagging::TagFailure;

/// Error type returned by the outbound AWS calls.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub(crate) type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Coarse classification of a [`TaggerError`].
///
/// Every kind fails the invocation; the kind only tells which layer failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The delivery, its envelope or the embedded compliance event could not be decoded
    Decode,
    /// No region-scoped session could be established
    Session,
    /// The resource ARN could not be resolved
    Lookup,
    /// The resource could not be tagged
    Tag,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Decode => "decode",
            ErrorKind::Session => "session",
            ErrorKind::Lookup => "lookup",
            ErrorKind::Tag => "tag",
        };
        f.write_str(name)
    }
}

/// Failure of a single invocation.
#[derive(Debug, thiserror::Error)]
pub enum TaggerError {
    #[error("the SQS delivery contains no records")]
    NoRecords,
    #[error("SQS message {message_id:?} has no body")]
    MissingBody { message_id: Option<String> },
    #[error("could not decode notification envelope: {0}")]
    Envelope(#[source] JsonPathError),
    #[error("could not decode compliance event: {0}")]
    Event(#[source] JsonPathError),
    #[error("could not create AWS session for region {region:?}: {reason}")]
    Session { region: String, reason: String },
    #[error("could not get resource config: {0}")]
    Lookup(#[source] BoxError),
    #[error("could not get ARN, probably resource {resource_id} - {resource_type} has been deleted")]
    ResourceNotFound { resource_id: String, resource_type: String },
    #[error("configuration item for {resource_id} - {resource_type} has no ARN")]
    MissingArn { resource_id: String, resource_type: String },
    #[error("could not tag resource: {0}")]
    Tag(#[source] BoxError),
    #[error("could not tag resources: {}", format_failures(.failed))]
    PartialFailure { failed: HashMap<String, TagFailure> },
}

impl TaggerError {
    /// Returns the layer this error originated from
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaggerError::NoRecords
            | TaggerError::MissingBody { .. }
            | TaggerError::Envelope(_)
            | TaggerError::Event(_) => ErrorKind::Decode,
            TaggerError::Session { .. } => ErrorKind::Session,
            TaggerError::Lookup(_) | TaggerError::ResourceNotFound { .. } | TaggerError::MissingArn { .. } => {
                ErrorKind::Lookup
            }
            TaggerError::Tag(_) | TaggerError::PartialFailure { .. } => ErrorKind::Tag,
        }
    }
}

fn format_failures(failed: &HashMap<String, TagFailure>) -> String {
    let mut arns: Vec<_> = failed.iter().collect();
    arns.sort_by(|a, b| a.0.cmp(b.0));
    arns.iter()
        .map(|(arn, failure)| format!("{} ({})", arn, failure))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Invalid start-up configuration.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("tag key is {0} characters long, at most {max} are allowed", max = crate::config::MAX_TAG_KEY_LEN)]
    KeyTooLong(usize),
    #[error("tag value is {0} characters long, at most {max} are allowed", max = crate::config::MAX_TAG_VALUE_LEN)]
    ValueTooLong(usize),
    #[error("tag key {0:?} uses the reserved \"aws:\" prefix")]
    ReservedPrefix(String),
}
