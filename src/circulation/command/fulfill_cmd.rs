use std::sync::Arc;
use async_trait::async_trait;
use serde::Deserialize;
use crate::circulation::domain::CirculationService;
use crate::core::command::{Command, CommandError};
use crate::delivery::dto::DeliveredContent;

pub struct FulfillCommand {
    circulation_service: Arc<dyn CirculationService>,
}

impl FulfillCommand {
    pub fn new(circulation_service: Arc<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FulfillCommandRequest {
    library_id: String,
    credential: Option<String>,
    pool_id: String,
    mechanism_id: Option<String>,
}

impl FulfillCommandRequest {
    pub fn new(library_id: &str, credential: Option<&str>, pool_id: &str, mechanism_id: Option<&str>) -> Self {
        Self {
            library_id: library_id.to_string(),
            credential: credential.map(str::to_string),
            pool_id: pool_id.to_string(),
            mechanism_id: mechanism_id.map(str::to_string),
        }
    }
}

// the delivered bytes are returned as-is, never wrapped in JSON
#[derive(Debug)]
pub struct FulfillCommandResponse {
    pub content: DeliveredContent,
}

impl FulfillCommandResponse {
    pub fn new(content: DeliveredContent) -> Self {
        Self {
            content,
        }
    }
}

#[async_trait]
impl Command<FulfillCommandRequest, FulfillCommandResponse> for FulfillCommand {
    async fn execute(&self, req: FulfillCommandRequest) -> Result<FulfillCommandResponse, CommandError> {
        let ctx = self.circulation_service.request_context(
            req.library_id.as_str(), req.credential.as_deref()).await?;
        self.circulation_service.fulfill(&ctx, req.pool_id.as_str(), req.mechanism_id.as_deref())
            .await.map_err(CommandError::from).map(FulfillCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use crate::circulation::command::borrow_cmd::{BorrowCommand, BorrowCommandRequest};
    use crate::circulation::command::fulfill_cmd::{FulfillCommand, FulfillCommandRequest};
    use crate::circulation::command::testing::{command_fixture, CREDENTIAL};
    use crate::core::command::{Command, FailureKind};

    #[tokio::test]
    async fn test_should_run_fulfill() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ebooks/84.epub"))
            .respond_with(ResponseTemplate::new(200)
                .insert_header("content-type", "application/octet-stream")
                .set_body_bytes(b"PK\x03\x04".to_vec()))
            .mount(&server)
            .await;
        let fixture = command_fixture(format!("{}/ebooks/84.epub", server.uri()).as_str()).await;
        BorrowCommand::new(fixture.service.clone())
            .execute(BorrowCommandRequest::new("dev", Some(CREDENTIAL), "Gutenberg ID", "84", None))
            .await.expect("should borrow");
        let res = FulfillCommand::new(fixture.service.clone())
            .execute(FulfillCommandRequest::new("dev", Some(CREDENTIAL), fixture.pool.pool_id.as_str(), Some("epub")))
            .await.expect("should fulfill");
        assert_eq!(200, res.content.status);
        assert_eq!(Some("application/epub+zip"), res.content.header("content-type"));
        assert_eq!(b"PK\x03\x04".to_vec(), res.content.body);
    }

    #[tokio::test]
    async fn test_should_report_remote_fetch_failure() {
        let fixture = command_fixture("http://127.0.0.1:1/ebooks/84.epub").await;
        BorrowCommand::new(fixture.service.clone())
            .execute(BorrowCommandRequest::new("dev", Some(CREDENTIAL), "Gutenberg ID", "84", None))
            .await.expect("should borrow");
        let err = FulfillCommand::new(fixture.service.clone())
            .execute(FulfillCommandRequest::new("dev", Some(CREDENTIAL), fixture.pool.pool_id.as_str(), Some("epub")))
            .await.err().expect("should fail");
        assert_eq!(FailureKind::RemoteFetchFailed, err.kind);
        assert_eq!(502, err.status);
    }
}
