use serde::{Deserialize, Serialize};

pub mod ddb;
pub mod events;
pub mod factory;
pub mod logs;
pub mod sns;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum GatewayPublisherVia {
    Sns { topic_arn: String },
    DynamoDB,
    Logs,
}
