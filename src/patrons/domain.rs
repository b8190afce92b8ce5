pub mod model;
pub mod service;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::core::library::LibraryResult;
use crate::patrons::dto::PatronDto;

#[async_trait]
pub trait PatronService: Sync + Send {
    async fn add_patron(&self, patron: &PatronDto) -> LibraryResult<()>;
    async fn update_patron(&self, patron: &PatronDto) -> LibraryResult<()>;
    async fn find_patron_by_id(&self, id: &str) -> LibraryResult<PatronDto>;
    // resolves the credential presented on a request to a patron of the library
    async fn authenticate(&self, library_id: &str, authorization_identifier: &str) -> LibraryResult<PatronDto>;
    async fn record_external_sync(&self, patron: &PatronDto, synced_at: NaiveDateTime) -> LibraryResult<PatronDto>;
}
