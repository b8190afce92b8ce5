use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::circulation::dto::Bookshelf;
use crate::core::command::{Command, CommandError};

pub struct BookshelfCommand {
    circulation_service: Arc<dyn CirculationService>,
}

impl BookshelfCommand {
    pub fn new(circulation_service: Arc<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookshelfCommandRequest {
    library_id: String,
    credential: Option<String>,
    #[serde(default)]
    force_sync: bool,
}

impl BookshelfCommandRequest {
    pub fn new(library_id: &str, credential: Option<&str>, force_sync: bool) -> Self {
        Self {
            library_id: library_id.to_string(),
            credential: credential.map(str::to_string),
            force_sync,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookshelfCommandResponse {
    #[serde(flatten)]
    pub bookshelf: Bookshelf,
}

impl BookshelfCommandResponse {
    pub fn new(bookshelf: Bookshelf) -> Self {
        Self {
            bookshelf,
        }
    }
}

#[async_trait]
impl Command<BookshelfCommandRequest, BookshelfCommandResponse> for BookshelfCommand {
    async fn execute(&self, req: BookshelfCommandRequest) -> Result<BookshelfCommandResponse, CommandError> {
        let ctx = self.circulation_service.request_context(
            req.library_id.as_str(), req.credential.as_deref()).await?;
        self.circulation_service.sync(&ctx, req.force_sync)
            .await.map_err(CommandError::from).map(BookshelfCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::circulation::command::bookshelf_cmd::{BookshelfCommand, BookshelfCommandRequest};
    use crate::circulation::command::borrow_cmd::{BorrowCommand, BorrowCommandRequest};
    use crate::circulation::command::testing::{command_fixture, CREDENTIAL};
    use crate::core::command::Command;

    #[tokio::test]
    async fn test_should_run_bookshelf() {
        let fixture = command_fixture("https://www.gutenberg.org/ebooks/84.epub.images").await;
        BorrowCommand::new(fixture.service.clone())
            .execute(BorrowCommandRequest::new("dev", Some(CREDENTIAL), "Gutenberg ID", "84", None))
            .await.expect("should borrow");
        let res = BookshelfCommand::new(fixture.service.clone())
            .execute(BookshelfCommandRequest::new("dev", Some(CREDENTIAL), false))
            .await.expect("should list bookshelf");
        assert!(res.bookshelf.synced);
        assert_eq!(1, res.bookshelf.loans.len());
        assert!(res.bookshelf.holds.is_empty());

        // open-access loans are kept locally only and survive every sync
        let patron = fixture.services.patrons.authenticate("dev", CREDENTIAL).await.expect("should find patron");
        assert!(patron.last_external_sync.is_some());
        let res = BookshelfCommand::new(fixture.service.clone())
            .execute(BookshelfCommandRequest::new("dev", Some(CREDENTIAL), true))
            .await.expect("should list bookshelf");
        assert_eq!(1, res.bookshelf.loans.len());
    }
}
