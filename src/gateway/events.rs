use async_trait::async_trait;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;

#[async_trait]
pub trait EventPublisher: Sync + Send {
    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};
    use async_trait::async_trait;
    use crate::core::events::DomainEvent;
    use crate::core::library::LibraryError;
    use crate::gateway::events::EventPublisher;

    // MemoryPublisher keeps published events so tests can assert on them.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct MemoryPublisher {
        events: Arc<Mutex<Vec<DomainEvent>>>,
        fail: bool,
    }

    impl MemoryPublisher {
        pub(crate) fn failing() -> Self {
            Self { events: Arc::default(), fail: true }
        }

        pub(crate) fn names(&self) -> Vec<String> {
            self.events.lock().map(|events| events.iter().map(|e| e.name.to_string()).collect()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl EventPublisher for MemoryPublisher {
        async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError> {
            if self.fail {
                return Err(LibraryError::runtime("publisher unavailable", None));
            }
            if let Ok(mut events) = self.events.lock() {
                events.push(event.clone());
            }
            Ok(())
        }
    }
}
