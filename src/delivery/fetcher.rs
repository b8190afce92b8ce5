use std::time::Duration;
use async_trait::async_trait;
use tracing::warn;
use crate::core::library::{LibraryError, LibraryResult};
use crate::delivery::dto::DeliveredContent;

// headers that describe one connection and must not be forwarded
const HOP_BY_HOP: [&str; 9] = [
    "connection", "keep-alive", "proxy-authenticate", "proxy-authorization",
    "te", "trailer", "transfer-encoding", "upgrade", "content-length",
];

// ContentFetcher retrieves remote content so it can be served from our own origin.
#[async_trait]
pub trait ContentFetcher: Sync + Send {
    async fn fetch(&self, url: &str) -> LibraryResult<DeliveredContent>;
}

#[derive(Debug, Clone)]
pub struct HttpContentFetcher {
    client: reqwest::Client,
}

impl HttpContentFetcher {
    pub fn new(timeout_secs: u64) -> LibraryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LibraryError::runtime(format!("failed to build HTTP client: {}", e).as_str(), None))?;
        Ok(Self { client })
    }
}

pub(crate) fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| h.eq_ignore_ascii_case(name))
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, url: &str) -> LibraryResult<DeliveredContent> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            warn!(url = url, error = %e, "remote content fetch failed");
            LibraryError::remote_fetch_failed(e.to_string().as_str(), url)
        })?;
        let status = resp.status().as_u16();
        let headers = resp.headers().iter()
            .filter(|(name, _)| !is_hop_by_hop(name.as_str()))
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.to_string(), v.to_string())))
            .collect();
        let body = resp.bytes().await
            .map_err(|e| LibraryError::remote_fetch_failed(e.to_string().as_str(), url))?;
        Ok(DeliveredContent { status, headers, body: body.to_vec() })
    }
}
