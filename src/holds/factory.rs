use crate::core::repository::RepositoryStore;
use crate::holds::domain::HoldService;
use crate::holds::domain::service::HoldServiceImpl;
use crate::holds::repository::ddb_hold_repository::DDBHoldRepository;
use crate::holds::repository::HoldRepository;
use crate::holds::repository::memory_hold_repository::MemoryHoldRepository;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_hold_repository(store: RepositoryStore) -> Box<dyn HoldRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBHoldRepository::new(client, "holds", "holds_ndx"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "holds", "hold_id", "patron_id", "pool_id").await;
            Box::new(DDBHoldRepository::new(client, "holds", "holds_ndx"))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryHoldRepository::new())
        }
    }
}

pub async fn create_hold_service(store: RepositoryStore) -> Box<dyn HoldService> {
    Box::new(HoldServiceImpl::new(create_hold_repository(store).await))
}
