pub mod model;
pub mod service;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::holds::dto::HoldDto;

#[async_trait]
pub trait HoldService: Sync + Send {
    async fn add_hold(&self, hold: &HoldDto) -> LibraryResult<()>;
    async fn update_hold(&self, hold: &HoldDto) -> LibraryResult<HoldDto>;
    async fn remove_hold(&self, hold_id: &str) -> LibraryResult<()>;
    async fn find_hold(&self, patron_id: &str, pool_id: &str) -> LibraryResult<Option<HoldDto>>;
    async fn find_holds_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<HoldDto>>;
}
