//! Resolution of a reported resource to its ARN through AWS Config

use std::fmt;

use async_trait::async_trait;
use aws_sdk_config::{
    operation::batch_get_resource_config::BatchGetResourceConfigOutput,
    types::{ResourceKey as SdkResourceKey, ResourceType},
};

use crate::{
    error::{BoxError, TaggerError},
    event::ComplianceEvent,
};

/// Identifies one resource in the AWS Config inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceKey {
    pub resource_id: String,
    pub resource_type: String,
}

impl From<&ComplianceEvent> for ResourceKey {
    fn from(event: &ComplianceEvent) -> Self {
        Self {
            resource_id: event.resource_id.clone(),
            resource_type: event.resource_type.clone(),
        }
    }
}

/// The parts of a configuration item this crate reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationItem {
    pub arn: Option<String>,
}

/// A resource ARN
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocator(String);

impl ResourceLocator {
    pub fn new(arn: impl Into<String>) -> Self {
        Self(arn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ResourceLocator> for String {
    fn from(locator: ResourceLocator) -> Self {
        locator.0
    }
}

/// Current configuration lookup, scoped to one region
#[async_trait]
pub trait ConfigLookup: Send + Sync {
    async fn batch_get_resource_config(&self, key: &ResourceKey) -> Result<Vec<ConfigurationItem>, BoxError>;
}

/// Looks up the ARN of the resource named by `event`.
///
/// Only the first returned item is considered. An empty result usually means
/// the resource was deleted after it was evaluated.
pub async fn resolve_locator(lookup: &dyn ConfigLookup, event: &ComplianceEvent) -> Result<ResourceLocator, TaggerError> {
    let key = ResourceKey::from(event);
    let items = lookup
        .batch_get_resource_config(&key)
        .await
        .map_err(TaggerError::Lookup)?;

    let item = items.into_iter().next().ok_or_else(|| TaggerError::ResourceNotFound {
        resource_id: key.resource_id.clone(),
        resource_type: key.resource_type.clone(),
    })?;

    match item.arn {
        Some(arn) if !arn.is_empty() => Ok(ResourceLocator(arn)),
        _ => Err(TaggerError::MissingArn {
            resource_id: key.resource_id,
            resource_type: key.resource_type,
        }),
    }
}

/// `ConfigLookup` backed by the AWS Config `BatchGetResourceConfig` API
pub struct AwsConfigLookup {
    client: aws_sdk_config::Client,
}

impl AwsConfigLookup {
    pub fn new(client: aws_sdk_config::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfigLookup for AwsConfigLookup {
    async fn batch_get_resource_config(&self, key: &ResourceKey) -> Result<Vec<ConfigurationItem>, BoxError> {
        let sdk_key = SdkResourceKey::builder()
            .resource_id(key.resource_id.as_str())
            .resource_type(ResourceType::from(key.resource_type.as_str()))
            .build()?;

        let output = self
            .client
            .batch_get_resource_config()
            .resource_keys(sdk_key)
            .send()
            .await
            .map_err(aws_sdk_config::Error::from)?;

        configuration_items(key, &output)
    }
}

/// The requested key came back in `UnprocessedResourceKeys`
#[derive(Debug, thiserror::Error)]
#[error("config left resource key {resource_id} - {resource_type} unprocessed")]
pub struct UnprocessedKey {
    pub resource_id: String,
    pub resource_type: String,
}

// only one key is ever requested, so any unprocessed key is that one
fn configuration_items(
    key: &ResourceKey,
    output: &BatchGetResourceConfigOutput,
) -> Result<Vec<ConfigurationItem>, BoxError> {
    if !output.unprocessed_resource_keys().is_empty() {
        return Err(Box::new(UnprocessedKey {
            resource_id: key.resource_id.clone(),
            resource_type: key.resource_type.clone(),
        }));
    }

    Ok(output
        .base_configuration_items()
        .iter()
        .map(|item| ConfigurationItem {
            arn: item.arn().map(str::to_owned),
        })
        .collect())
}
