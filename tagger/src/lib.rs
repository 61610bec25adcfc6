//! Tags AWS resources reported by AWS Config compliance notifications.
//!
//! A Lambda function subscribed to an SQS queue receives EventBridge
//! "Config Rules Compliance Change" events. For each delivery the first
//! record is decoded, the resource ARN is resolved through AWS Config and
//! the configured business tag is applied through the Resource Groups
//! Tagging API.
//!
//! ```rust,no_run
//! use compliance_tagger::{AwsConnector, NotificationTagger, TagConfig};
//!
//! # async fn run(body: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let tagger = NotificationTagger::new(TagConfig::from_env()?, AwsConnector);
//! let tagged = tagger.process(body).await?;
//! assert!(tagged);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod event;
mod handler;
pub mod resolver;
mod session;
pub mod tagging;

pub use crate::{
    config::TagConfig,
    error::{BoxError, ConfigError, ErrorKind, TaggerError},
    handler::NotificationTagger,
    session::{AwsConnector, Connector, Session},
};
