pub mod model;
pub mod service;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::works::dto::{LicensePoolDto, PoolAvailability};

// CatalogService looks up the license pools a library can lend from.
#[async_trait]
pub trait CatalogService: Sync + Send {
    async fn add_pool(&self, pool: &LicensePoolDto) -> LibraryResult<()>;
    async fn find_pool(&self, pool_id: &str) -> LibraryResult<LicensePoolDto>;
    async fn find_pools(&self, library_id: &str, identifier_type: &str, identifier: &str) -> LibraryResult<Vec<LicensePoolDto>>;
    // records counters the licensor just reported
    async fn apply_availability(&self, pool_id: &str, availability: &PoolAvailability) -> LibraryResult<LicensePoolDto>;
}
