use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::utils::date::opt_serializer;

// FulfillmentContent is what the licensor handed back for a loan.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum FulfillmentContent {
    // bytes to return as-is, e.g. a DRM license document
    Inline { content: Vec<u8> },
    // a location the content must be fetched from
    Link { url: String },
    Streaming { url: String },
}

// FulfillmentDto is produced for one fulfill request and never stored.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FulfillmentDto {
    pub pool_id: String,
    pub mechanism_id: String,
    pub content_type: Option<String>,
    pub content: FulfillmentContent,
    #[serde(with = "opt_serializer", default)]
    pub expires: Option<NaiveDateTime>,
    // set from the delivery mechanism; a streaming link is described, never fetched
    #[serde(default)]
    pub is_streaming: bool,
}

impl FulfillmentDto {
    pub fn new(pool_id: &str, mechanism_id: &str, content_type: Option<&str>, content: FulfillmentContent) -> Self {
        Self {
            pool_id: pool_id.to_string(),
            mechanism_id: mechanism_id.to_string(),
            content_type: content_type.map(str::to_string),
            content,
            expires: None,
            is_streaming: false,
        }
    }

    pub fn streaming(mut self, is_streaming: bool) -> Self {
        self.is_streaming = self.is_streaming || is_streaming;
        self
    }

    // the endpoint to stream from, when this fulfillment is delivered as a stream
    pub fn streaming_url(&self) -> Option<&str> {
        match &self.content {
            FulfillmentContent::Streaming { url } => Some(url.as_str()),
            FulfillmentContent::Link { url } if self.is_streaming => Some(url.as_str()),
            _ => None,
        }
    }
}

// DeliveredContent is the status, headers and body a caller returns to the patron.
#[derive(Debug, PartialEq, Clone)]
pub struct DeliveredContent {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl DeliveredContent {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
