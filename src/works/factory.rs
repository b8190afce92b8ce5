use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};
use crate::works::domain::CatalogService;
use crate::works::domain::service::CatalogServiceImpl;
use crate::works::repository::ddb_pool_repository::DDBPoolRepository;
use crate::works::repository::LicensePoolRepository;
use crate::works::repository::memory_pool_repository::MemoryPoolRepository;

pub(crate) async fn create_pool_repository(store: RepositoryStore) -> Box<dyn LicensePoolRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBPoolRepository::new(client, "license_pools", "license_pools_ndx"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "license_pools", "pool_id", "identifier", "library_id").await;
            Box::new(DDBPoolRepository::new(client, "license_pools", "license_pools_ndx"))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryPoolRepository::new())
        }
    }
}

pub async fn create_catalog_service(store: RepositoryStore) -> Box<dyn CatalogService> {
    Box::new(CatalogServiceImpl::new(create_pool_repository(store).await))
}
