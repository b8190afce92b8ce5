use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::circulation::dto::ActivityDto;
use crate::core::command::{Command, CommandError};

pub struct DetailCommand {
    circulation_service: Arc<dyn CirculationService>,
}

impl DetailCommand {
    pub fn new(circulation_service: Arc<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DetailCommandRequest {
    library_id: String,
    credential: Option<String>,
    identifier_type: String,
    identifier: String,
}

impl DetailCommandRequest {
    pub fn new(library_id: &str, credential: Option<&str>, identifier_type: &str, identifier: &str) -> Self {
        Self {
            library_id: library_id.to_string(),
            credential: credential.map(str::to_string),
            identifier_type: identifier_type.to_string(),
            identifier: identifier.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetailCommandResponse {
    #[serde(flatten)]
    pub activity: ActivityDto,
}

impl DetailCommandResponse {
    pub fn new(activity: ActivityDto) -> Self {
        Self {
            activity,
        }
    }
}

#[async_trait]
impl Command<DetailCommandRequest, DetailCommandResponse> for DetailCommand {
    async fn execute(&self, req: DetailCommandRequest) -> Result<DetailCommandResponse, CommandError> {
        let ctx = self.circulation_service.request_context(
            req.library_id.as_str(), req.credential.as_deref()).await?;
        self.circulation_service.detail(&ctx, req.identifier_type.as_str(), req.identifier.as_str())
            .await.map_err(CommandError::from).map(DetailCommandResponse::new)
    }
}
