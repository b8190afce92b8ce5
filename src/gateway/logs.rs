use async_trait::async_trait;
use tracing::info;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;

// LogPublisher writes events to the structured log instead of a broker.
#[derive(Debug, Default)]
pub struct LogPublisher {}

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError> {
        info!(event_id = %event.event_id, name = %event.name, key = %event.key, kind = ?event.kind,
            data = %event.json_data, "circulation event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::core::events::DomainEvent;
    use crate::gateway::events::EventPublisher;
    use crate::gateway::logs::LogPublisher;

    #[tokio::test]
    async fn test_should_publish_to_log() {
        let event = DomainEvent::added("hold_placed", "holds", "key", &HashMap::new(), &1).expect("build event");
        LogPublisher::default().publish(&event).await.expect("should publish");
    }
}
