use aws_lambda_events::event::sqs::SqsEvent;

use crate::{
    config::TagConfig,
    error::TaggerError,
    event,
    resolver::resolve_locator,
    session::Connector,
    tagging::apply_tag,
};

/// Tags the resource named by an AWS Config compliance notification.
///
/// Each notification goes through decode, session, ARN lookup and tagging in
/// that order. The first failing step ends the invocation and nothing after it
/// runs.
pub struct NotificationTagger<C> {
    config: TagConfig,
    connector: C,
}

impl<C> NotificationTagger<C>
where
    C: Connector,
{
    pub fn new(config: TagConfig, connector: C) -> Self {
        Self { config, connector }
    }

    /// Handles one SQS delivery, processing its first record only
    pub async fn handle(&self, event: SqsEvent) -> Result<bool, TaggerError> {
        let body = event::first_body(event)?;
        self.process(&body).await
    }

    /// Handles one record body
    pub async fn process(&self, body: &str) -> Result<bool, TaggerError> {
        tracing::debug!(%body, "received message");
        let result = self.run(body).await;
        if let Err(e) = &result {
            tracing::error!(kind = %e.kind(), error = %e, "invocation failed");
        }
        result
    }

    async fn run(&self, body: &str) -> Result<bool, TaggerError> {
        let event = event::from_str(body)?;
        tracing::info!(
            resource_id = %event.resource_id,
            resource_type = %event.resource_type,
            region = %event.region,
            account_id = %event.account_id,
            rule = %event.config_rule_name,
            compliance = %event.new_evaluation_result.compliance_type,
            "decoded compliance event"
        );

        let session = self.connector.connect(&event.region).await?;

        let locator = resolve_locator(session.lookup(), &event).await?;
        tracing::info!(arn = %locator, region = session.region(), "ARN to tag");

        apply_tag(session.tagging(), &locator, &self.config).await
    }
}
