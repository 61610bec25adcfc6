//! Tagging through the Resource Groups Tagging API

use std::{collections::HashMap, fmt};

use async_trait::async_trait;
use aws_sdk_resourcegroupstagging::types::FailureInfo;

use crate::{
    config::TagConfig,
    error::{BoxError, TaggerError},
    resolver::ResourceLocator,
};

/// Why the tagging service refused to tag one resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFailure {
    pub status_code: Option<i32>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl fmt::Display for TagFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.status_code {
            write!(f, "{} ", status)?;
        }
        f.write_str(self.error_code.as_deref().unwrap_or("unknown error"))?;
        if let Some(message) = &self.error_message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl From<&FailureInfo> for TagFailure {
    fn from(info: &FailureInfo) -> Self {
        Self {
            status_code: Some(info.status_code()),
            error_code: info.error_code().map(|c| c.as_str().to_owned()),
            error_message: info.error_message().map(str::to_owned),
        }
    }
}

/// Result of a tagging request that reached the service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagResponse {
    /// Resources the service could not tag, keyed by ARN
    pub failed: HashMap<String, TagFailure>,
}

/// Tagging service, scoped to one region
#[async_trait]
pub trait TagApi: Send + Sync {
    async fn tag_resources(
        &self,
        locators: &[ResourceLocator],
        tags: &HashMap<String, String>,
    ) -> Result<TagResponse, BoxError>;
}

/// Applies the configured tag to exactly one resource.
///
/// A response listing failed resources fails the call even though the request
/// itself succeeded.
pub async fn apply_tag(api: &dyn TagApi, locator: &ResourceLocator, config: &TagConfig) -> Result<bool, TaggerError> {
    let response = api
        .tag_resources(std::slice::from_ref(locator), &config.tags())
        .await
        .map_err(TaggerError::Tag)?;

    if !response.failed.is_empty() {
        return Err(TaggerError::PartialFailure {
            failed: response.failed,
        });
    }

    tracing::info!(arn = %locator, tag_key = config.tag_key(), "ARN successfully tagged");
    Ok(true)
}

/// `TagApi` backed by `TagResources`
pub struct AwsTagApi {
    client: aws_sdk_resourcegroupstagging::Client,
}

impl AwsTagApi {
    pub fn new(client: aws_sdk_resourcegroupstagging::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TagApi for AwsTagApi {
    async fn tag_resources(
        &self,
        locators: &[ResourceLocator],
        tags: &HashMap<String, String>,
    ) -> Result<TagResponse, BoxError> {
        let arns = locators.iter().map(|l| l.as_str().to_owned()).collect();
        let output = self
            .client
            .tag_resources()
            .set_resource_arn_list(Some(arns))
            .set_tags(Some(tags.clone()))
            .send()
            .await
            .map_err(aws_sdk_resourcegroupstagging::Error::from)?;

        let failed = output
            .failed_resources_map()
            .map(|failures| {
                failures
                    .iter()
                    .map(|(arn, info)| (arn.clone(), TagFailure::from(info)))
                    .collect()
            })
            .unwrap_or_default();
        Ok(TagResponse { failed })
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_tag, TagApi, TagFailure, TagResponse};
    use crate::{
        config::TagConfig,
        error::{BoxError, ErrorKind, TaggerError},
        resolver::ResourceLocator,
    };
    use async_trait::async_trait;
    use aws_sdk_resourcegroupstagging::types::{ErrorCode, FailureInfo};
    use maplit::hashmap;
    use simple_error::SimpleError;
    use std::{collections::HashMap, sync::Mutex};

    const ARN: &str = "arn:aws:s3:::my-bucket";

    struct StubTagApi {
        result: Result<TagResponse, String>,
        calls: Mutex<Vec<(Vec<ResourceLocator>, HashMap<String, String>)>>,
    }

    impl StubTagApi {
        fn new(result: Result<TagResponse, String>) -> Self {
            Self {
                result,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TagApi for StubTagApi {
        async fn tag_resources(
            &self,
            locators: &[ResourceLocator],
            tags: &HashMap<String, String>,
        ) -> Result<TagResponse, BoxError> {
            self.calls
                .lock()
                .expect("poisoned")
                .push((locators.to_vec(), tags.clone()));
            match &self.result {
                Ok(response) => Ok(response.clone()),
                Err(msg) => Err(Box::new(SimpleError::new(msg.as_str()))),
            }
        }
    }

    fn config() -> TagConfig {
        TagConfig::new("CostCenter", "security").expect("valid config")
    }

    #[tokio::test]
    async fn tags_exactly_one_resource() {
        let api = StubTagApi::new(Ok(TagResponse::default()));
        let tagged = apply_tag(&api, &ResourceLocator::new(ARN), &config())
            .await
            .expect("tagging should succeed");
        assert!(tagged);

        let calls = api.calls.lock().expect("poisoned");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, vec![ResourceLocator::new(ARN)]);
        assert_eq!(calls[0].1, hashmap! { "CostCenter".to_string() => "security".to_string() });
    }

    #[tokio::test]
    async fn failed_resources_fail_the_call() {
        let api = StubTagApi::new(Ok(TagResponse {
            failed: hashmap! {
                ARN.to_string() => TagFailure {
                    status_code: Some(500),
                    error_code: Some("InternalServiceException".into()),
                    error_message: None,
                },
            },
        }));
        match apply_tag(&api, &ResourceLocator::new(ARN), &config()).await {
            Err(err @ TaggerError::PartialFailure { .. }) => {
                assert_eq!(err.kind(), ErrorKind::Tag);
                assert_eq!(
                    err.to_string(),
                    "could not tag resources: arn:aws:s3:::my-bucket (500 InternalServiceException)"
                );
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[tokio::test]
    async fn transport_errors_are_tag_errors() {
        let api = StubTagApi::new(Err("ThrottledException".into()));
        match apply_tag(&api, &ResourceLocator::new(ARN), &config()).await {
            Err(TaggerError::Tag(e)) => assert_eq!(e.to_string(), "ThrottledException"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn converts_service_failure_info() {
        let info = FailureInfo::builder()
            .status_code(400)
            .error_code(ErrorCode::InvalidParameterException)
            .error_message("resource type not supported")
            .build();
        let failure = TagFailure::from(&info);
        assert_eq!(
            failure,
            TagFailure {
                status_code: Some(400),
                error_code: Some("InvalidParameterException".into()),
                error_message: Some("resource type not supported".into()),
            }
        );
        assert_eq!(
            failure.to_string(),
            "400 InvalidParameterException: resource type not supported"
        );
    }

    #[test]
    fn failure_display_without_details() {
        assert_eq!(TagFailure::default().to_string(), "unknown error");
    }
}
