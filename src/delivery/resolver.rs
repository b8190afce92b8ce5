use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;
use crate::core::library::LibraryResult;
use crate::delivery::dto::{DeliveredContent, FulfillmentContent, FulfillmentDto};
use crate::delivery::fetcher::ContentFetcher;
use crate::utils::date::opt_serializer;

const OCTET_STREAM: &str = "application/octet-stream";
pub const STREAMING_DOCUMENT_TYPE: &str = "application/vnd.circulation.streaming+json";

// StreamingDocument tells the client where to stream from instead of sending bytes.
#[derive(Debug, Serialize)]
struct StreamingDocument<'a> {
    pool_id: &'a str,
    mechanism_id: &'a str,
    content_type: Option<&'a str>,
    url: &'a str,
    #[serde(with = "opt_serializer")]
    expires: Option<NaiveDateTime>,
}

// DeliveryResolver turns a fulfillment into the response returned to the patron.
pub struct DeliveryResolver {
    fetcher: Box<dyn ContentFetcher>,
}

impl DeliveryResolver {
    pub fn new(fetcher: Box<dyn ContentFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn resolve(&self, fulfillment: &FulfillmentDto) -> LibraryResult<DeliveredContent> {
        if let Some(url) = fulfillment.streaming_url() {
            let doc = StreamingDocument {
                pool_id: fulfillment.pool_id.as_str(),
                mechanism_id: fulfillment.mechanism_id.as_str(),
                content_type: fulfillment.content_type.as_deref(),
                url,
                expires: fulfillment.expires,
            };
            return Ok(DeliveredContent {
                status: 200,
                headers: vec![("content-type".to_string(), STREAMING_DOCUMENT_TYPE.to_string())],
                body: serde_json::to_vec(&doc)?,
            });
        }
        match &fulfillment.content {
            FulfillmentContent::Inline { content } => {
                let content_type = fulfillment.content_type.as_deref().unwrap_or(OCTET_STREAM);
                Ok(DeliveredContent {
                    status: 200,
                    headers: vec![("content-type".to_string(), content_type.to_string())],
                    body: content.clone(),
                })
            }
            FulfillmentContent::Link { url } | FulfillmentContent::Streaming { url } => {
                info!(pool_id = fulfillment.pool_id.as_str(), url = url.as_str(), "proxying remote content");
                let mut delivered = self.fetcher.fetch(url).await?;
                // the licensor knows better than the content host what it handed out
                if let Some(content_type) = &fulfillment.content_type {
                    delivered.headers.retain(|(k, _)| !k.eq_ignore_ascii_case("content-type"));
                    delivered.headers.push(("content-type".to_string(), content_type.to_string()));
                }
                Ok(delivered)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use crate::core::library::{LibraryError, LibraryResult};
    use crate::delivery::dto::{DeliveredContent, FulfillmentContent, FulfillmentDto};
    use crate::delivery::fetcher::{ContentFetcher, HttpContentFetcher};
    use crate::delivery::resolver::{DeliveryResolver, STREAMING_DOCUMENT_TYPE};

    struct UnreachableFetcher {}

    #[async_trait]
    impl ContentFetcher for UnreachableFetcher {
        async fn fetch(&self, url: &str) -> LibraryResult<DeliveredContent> {
            Err(LibraryError::remote_fetch_failed("connection refused", url))
        }
    }

    #[tokio::test]
    async fn test_should_describe_streaming_endpoint() {
        let resolver = DeliveryResolver::new(Box::new(UnreachableFetcher {}));
        let fulfillment = FulfillmentDto::new("pool1", "stream", Some("text/html"),
                                              FulfillmentContent::Streaming { url: "https://stream.example/p1".to_string() });
        let delivered = resolver.resolve(&fulfillment).await.expect("should resolve");
        assert_eq!(200, delivered.status);
        assert_eq!(Some(STREAMING_DOCUMENT_TYPE), delivered.header("content-type"));
        let doc: serde_json::Value = serde_json::from_slice(&delivered.body).expect("should be json");
        assert_eq!("https://stream.example/p1", doc["url"]);
    }

    #[tokio::test]
    async fn test_should_describe_streaming_link_without_fetching() {
        let resolver = DeliveryResolver::new(Box::new(UnreachableFetcher {}));
        let fulfillment = FulfillmentDto::new("pool1", "stream", Some("text/html"),
                                              FulfillmentContent::Link { url: "https://reader.example/p1".to_string() })
            .streaming(true);
        let delivered = resolver.resolve(&fulfillment).await.expect("should resolve");
        assert_eq!(Some(STREAMING_DOCUMENT_TYPE), delivered.header("content-type"));
        let doc: serde_json::Value = serde_json::from_slice(&delivered.body).expect("should be json");
        assert_eq!("https://reader.example/p1", doc["url"]);
        assert_eq!("stream", doc["mechanism_id"]);
    }

    #[tokio::test]
    async fn test_should_pass_inline_content_through() {
        let resolver = DeliveryResolver::new(Box::new(UnreachableFetcher {}));
        let fulfillment = FulfillmentDto::new("pool1", "acsm", Some("application/vnd.adobe.adept+xml"),
                                              FulfillmentContent::Inline { content: b"<fulfillmentToken/>".to_vec() });
        let delivered = resolver.resolve(&fulfillment).await.expect("should resolve");
        assert_eq!(b"<fulfillmentToken/>".to_vec(), delivered.body);
        assert_eq!(Some("application/vnd.adobe.adept+xml"), delivered.header("content-type"));
    }

    #[tokio::test]
    async fn test_should_proxy_link_and_override_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dl/1342"))
            .respond_with(ResponseTemplate::new(200)
                .insert_header("content-type", "application/octet-stream")
                .insert_header("cache-control", "private")
                .set_body_bytes(b"PK".to_vec()))
            .mount(&server)
            .await;
        let resolver = DeliveryResolver::new(Box::new(HttpContentFetcher::new(5).expect("should build fetcher")));
        let fulfillment = FulfillmentDto::new("pool1", "epub", Some("application/epub+zip"),
                                              FulfillmentContent::Link { url: format!("{}/dl/1342", server.uri()) });
        let delivered = resolver.resolve(&fulfillment).await.expect("should resolve");
        assert_eq!(Some("application/epub+zip"), delivered.header("content-type"));
        assert_eq!(Some("private"), delivered.header("cache-control"));
        assert_eq!(b"PK".to_vec(), delivered.body);
    }

    #[tokio::test]
    async fn test_should_report_fetch_failure_distinctly() {
        let resolver = DeliveryResolver::new(Box::new(UnreachableFetcher {}));
        let fulfillment = FulfillmentDto::new("pool1", "epub", None,
                                              FulfillmentContent::Link { url: "https://cdn.example/x".to_string() });
        assert!(matches!(resolver.resolve(&fulfillment).await, Err(LibraryError::RemoteFetchFailed { .. })));
    }
}
