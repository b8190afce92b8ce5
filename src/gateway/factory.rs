use crate::core::repository::RepositoryStore;
use crate::gateway::ddb::publisher::DDBPublisher;
use crate::gateway::events::EventPublisher;
use crate::gateway::GatewayPublisherVia;
use crate::gateway::logs::LogPublisher;
use crate::gateway::sns::publisher::SnsPublisher;
use crate::utils::ddb::{build_db_client, build_sns_client, create_table};

pub(crate) async fn create_publisher(via: GatewayPublisherVia, store: RepositoryStore) -> Box<dyn EventPublisher> {
    match via {
        GatewayPublisherVia::Sns { topic_arn } => {
            let client = build_sns_client().await;
            Box::new(SnsPublisher::new(client, topic_arn.as_str()))
        }
        GatewayPublisherVia::DynamoDB => {
            let client = build_db_client(store).await;
            if store == RepositoryStore::LocalDynamoDB {
                let _ = create_table(&client, "events", "event_id", "group", "key").await;
            }
            Box::new(DDBPublisher::new(client, "events"))
        }
        GatewayPublisherVia::Logs => {
            Box::new(LogPublisher::default())
        }
    }
}
