use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};

use crate::{
    error::TaggerError,
    resolver::{AwsConfigLookup, ConfigLookup},
    tagging::{AwsTagApi, TagApi},
};

/// Clients for the services used while handling one notification, all
/// targeting the region the notification came from.
pub struct Session {
    region: String,
    lookup: Box<dyn ConfigLookup>,
    tagging: Box<dyn TagApi>,
}

impl Session {
    pub fn new(region: impl Into<String>, lookup: Box<dyn ConfigLookup>, tagging: Box<dyn TagApi>) -> Self {
        Self {
            region: region.into(),
            lookup,
            tagging,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn lookup(&self) -> &dyn ConfigLookup {
        self.lookup.as_ref()
    }

    pub fn tagging(&self) -> &dyn TagApi {
        self.tagging.as_ref()
    }
}

/// Builds a `Session` for a region
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, region: &str) -> Result<Session, TaggerError>;
}

/// Connects to the real AWS services using the default credential chain
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsConnector;

#[async_trait]
impl Connector for AwsConnector {
    async fn connect(&self, region: &str) -> Result<Session, TaggerError> {
        validate_region(region)?;

        let conf = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .load()
            .await;

        let lookup = AwsConfigLookup::new(aws_sdk_config::Client::new(&conf));
        let tagging = AwsTagApi::new(aws_sdk_resourcegroupstagging::Client::new(&conf));
        tracing::debug!(region, "created AWS session");

        Ok(Session::new(region, Box::new(lookup), Box::new(tagging)))
    }
}

// region names look like "us-east-1" or "us-gov-west-1"
pub(crate) fn validate_region(region: &str) -> Result<(), TaggerError> {
    let reason = if region.is_empty() {
        "region is empty"
    } else if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        "region contains invalid characters"
    } else if region.starts_with('-') || region.ends_with('-') {
        "region must not start or end with '-'"
    } else {
        return Ok(());
    };

    Err(TaggerError::Session {
        region: region.to_owned(),
        reason: reason.to_owned(),
    })
}
