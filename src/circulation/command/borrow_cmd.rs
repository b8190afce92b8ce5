use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::circulation::dto::BorrowOutcome;
use crate::core::command::{Command, CommandError};

pub struct BorrowCommand {
    circulation_service: Arc<dyn CirculationService>,
}

impl BorrowCommand {
    pub fn new(circulation_service: Arc<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BorrowCommandRequest {
    library_id: String,
    credential: Option<String>,
    identifier_type: String,
    identifier: String,
    mechanism_id: Option<String>,
}

impl BorrowCommandRequest {
    pub fn new(library_id: &str, credential: Option<&str>, identifier_type: &str, identifier: &str,
               mechanism_id: Option<&str>) -> Self {
        Self {
            library_id: library_id.to_string(),
            credential: credential.map(str::to_string),
            identifier_type: identifier_type.to_string(),
            identifier: identifier.to_string(),
            mechanism_id: mechanism_id.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BorrowCommandResponse {
    #[serde(flatten)]
    pub outcome: BorrowOutcome,
}

impl BorrowCommandResponse {
    pub fn new(outcome: BorrowOutcome) -> Self {
        Self {
            outcome,
        }
    }
}

#[async_trait]
impl Command<BorrowCommandRequest, BorrowCommandResponse> for BorrowCommand {
    async fn execute(&self, req: BorrowCommandRequest) -> Result<BorrowCommandResponse, CommandError> {
        let ctx = self.circulation_service.request_context(
            req.library_id.as_str(), req.credential.as_deref()).await?;
        self.circulation_service.borrow(&ctx, req.identifier_type.as_str(), req.identifier.as_str(),
                                        req.mechanism_id.as_deref())
            .await.map_err(CommandError::from).map(BorrowCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::circulation::command::borrow_cmd::{BorrowCommand, BorrowCommandRequest};
    use crate::circulation::command::testing::{command_fixture, CREDENTIAL};
    use crate::circulation::dto::BorrowOutcome;
    use crate::core::command::{Command, FailureKind};

    #[tokio::test]
    async fn test_should_run_borrow() {
        let fixture = command_fixture("https://www.gutenberg.org/ebooks/84.epub.images").await;
        let cmd = BorrowCommand::new(fixture.service.clone());
        let res = cmd.execute(BorrowCommandRequest::new("dev", Some(CREDENTIAL), "Gutenberg ID", "84", None))
            .await.expect("should borrow");
        assert!(res.outcome.is_new());
        match res.outcome {
            BorrowOutcome::Loan { loan, .. } => {
                assert_eq!(fixture.pool.pool_id, loan.pool_id);
                assert_eq!(None, loan.end);
            }
            other => panic!("unexpected {:?}", other),
        }
        let json = serde_json::to_value(
            cmd.execute(BorrowCommandRequest::new("dev", Some(CREDENTIAL), "Gutenberg ID", "84", None)).await
                .err().expect("should fail second borrow")).expect("should serialize");
        assert_eq!("already_checked_out", json["kind"]);
    }

    #[tokio::test]
    async fn test_should_report_unknown_title() {
        let fixture = command_fixture("https://www.gutenberg.org/ebooks/84.epub.images").await;
        let err = BorrowCommand::new(fixture.service)
            .execute(BorrowCommandRequest::new("dev", Some(CREDENTIAL), "ISBN", "0000000000", None))
            .await.err().expect("should fail");
        assert_eq!(FailureKind::NoLicenses, err.kind);
        assert_eq!(404, err.status);
    }

    #[tokio::test]
    async fn test_should_require_credentials() {
        let fixture = command_fixture("https://www.gutenberg.org/ebooks/84.epub.images").await;
        let err = BorrowCommand::new(fixture.service)
            .execute(BorrowCommandRequest::new("dev", None, "Gutenberg ID", "84", None))
            .await.err().expect("should fail");
        assert_eq!(FailureKind::InvalidCredentials, err.kind);
        assert_eq!(401, err.status);
    }
}
