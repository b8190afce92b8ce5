use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::circulation::dto::RevokeOutcome;
use crate::core::command::{Command, CommandError};

pub struct RevokeCommand {
    circulation_service: Arc<dyn CirculationService>,
}

impl RevokeCommand {
    pub fn new(circulation_service: Arc<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RevokeCommandRequest {
    library_id: String,
    credential: Option<String>,
    pool_id: String,
}

impl RevokeCommandRequest {
    pub fn new(library_id: &str, credential: Option<&str>, pool_id: &str) -> Self {
        Self {
            library_id: library_id.to_string(),
            credential: credential.map(str::to_string),
            pool_id: pool_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RevokeCommandResponse {
    #[serde(flatten)]
    pub outcome: RevokeOutcome,
}

impl RevokeCommandResponse {
    pub fn new(outcome: RevokeOutcome) -> Self {
        Self {
            outcome,
        }
    }
}

#[async_trait]
impl Command<RevokeCommandRequest, RevokeCommandResponse> for RevokeCommand {
    async fn execute(&self, req: RevokeCommandRequest) -> Result<RevokeCommandResponse, CommandError> {
        let ctx = self.circulation_service.request_context(
            req.library_id.as_str(), req.credential.as_deref()).await?;
        self.circulation_service.revoke(&ctx, req.pool_id.as_str())
            .await.map_err(CommandError::from).map(RevokeCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::circulation::command::borrow_cmd::{BorrowCommand, BorrowCommandRequest};
    use crate::circulation::command::revoke_cmd::{RevokeCommand, RevokeCommandRequest};
    use crate::circulation::command::testing::{command_fixture, CREDENTIAL};
    use crate::circulation::dto::RevokeOutcome;
    use crate::core::command::{Command, FailureKind};

    #[tokio::test]
    async fn test_should_run_revoke() {
        let fixture = command_fixture("https://www.gutenberg.org/ebooks/84.epub.images").await;
        BorrowCommand::new(fixture.service.clone())
            .execute(BorrowCommandRequest::new("dev", Some(CREDENTIAL), "Gutenberg ID", "84", None))
            .await.expect("should borrow");
        let cmd = RevokeCommand::new(fixture.service.clone());
        let res = cmd.execute(RevokeCommandRequest::new("dev", Some(CREDENTIAL), fixture.pool.pool_id.as_str()))
            .await.expect("should revoke");
        assert!(matches!(res.outcome, RevokeOutcome::LoanReturned { .. }));

        let err = cmd.execute(RevokeCommandRequest::new("dev", Some(CREDENTIAL), fixture.pool.pool_id.as_str()))
            .await.err().expect("should fail second revoke");
        assert_eq!(FailureKind::NoActiveLoanOrHold, err.kind);
        assert_eq!(404, err.status);
    }
}
