use aws_sdk_sns::Client;
use async_trait::async_trait;
use aws_sdk_sns::error::SdkError;
use aws_sdk_sns::operation::publish::PublishError;
use tracing::debug;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;

// SnsPublisher fans circulation events out through a single SNS topic; the event
// name travels as a message attribute so subscribers can filter on it.
#[derive(Debug)]
pub struct SnsPublisher {
    client: Client,
    topic_arn: String,
}

impl SnsPublisher {
    pub(crate) fn new(client: Client, topic_arn: &str) -> Self {
        Self {
            client,
            topic_arn: topic_arn.to_string(),
        }
    }
}

#[async_trait]
impl EventPublisher for SnsPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError> {
        let json = serde_json::to_string(event)?;
        let name = aws_sdk_sns::types::MessageAttributeValue::builder()
            .data_type("String")
            .string_value(event.name.as_str())
            .build();
        let res = self.client.publish()
            .topic_arn(self.topic_arn.as_str())
            .message(json)
            .message_attributes("event_name", name)
            .send().await?;
        debug!("published {} as {:?}", event.name, res.message_id());
        Ok(())
    }
}

impl From<SdkError<PublishError>> for LibraryError {
    fn from(err: SdkError<PublishError>) -> Self {
        LibraryError::runtime(format!("{:?}", err).as_str(), None)
    }
}
