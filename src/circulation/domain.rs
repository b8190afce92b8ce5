use async_trait::async_trait;
use crate::circulation::dto::{ActivityDto, Bookshelf, BorrowOutcome, RevokeOutcome};
use crate::core::domain::RequestContext;
use crate::core::library::LibraryResult;
use crate::delivery::dto::DeliveredContent;

pub mod lending;
pub mod selector;
pub mod service;

// CirculationService is the entry point for every patron-facing lending
// operation. It finds the licensor serving a pool and hands the work to the
// lending state machine.
#[async_trait]
pub trait CirculationService: Sync + Send {
    async fn request_context(&self, library_id: &str, credential: Option<&str>) -> LibraryResult<RequestContext>;

    async fn borrow(&self, ctx: &RequestContext, identifier_type: &str, identifier: &str,
                    mechanism_id: Option<&str>) -> LibraryResult<BorrowOutcome>;

    async fn fulfill(&self, ctx: &RequestContext, pool_id: &str,
                     mechanism_id: Option<&str>) -> LibraryResult<DeliveredContent>;

    async fn revoke(&self, ctx: &RequestContext, pool_id: &str) -> LibraryResult<RevokeOutcome>;

    // never fails because a licensor did; the bookshelf then reflects local state
    async fn sync(&self, ctx: &RequestContext, force: bool) -> LibraryResult<Bookshelf>;

    async fn detail(&self, ctx: &RequestContext, identifier_type: &str, identifier: &str) -> LibraryResult<ActivityDto>;
}
