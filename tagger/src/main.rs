use std::sync::Arc;

use aws_lambda_events::event::sqs::SqsEvent;
use compliance_tagger::{AwsConnector, NotificationTagger, TagConfig};
use lamedh_runtime::{handler_fn, run, Context, Error};
use tracing_futures::Instrument;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        // CloudWatch adds the ingestion time
        .without_time()
        .with_target(false)
        .init();

    let config = TagConfig::from_env()?;
    tracing::info!(tag_key = config.tag_key(), tag_value = config.tag_value(), "loaded tag configuration");

    let tagger = Arc::new(NotificationTagger::new(config, AwsConnector));
    run(handler_fn(move |event: SqsEvent, context: Context| {
        let tagger = Arc::clone(&tagger);
        let span = tracing::info_span!("invocation", request_id = %context.request_id);
        async move { tagger.handle(event).await }.instrument(span)
    }))
    .await
}
