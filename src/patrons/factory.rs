use crate::core::repository::RepositoryStore;
use crate::patrons::domain::PatronService;
use crate::patrons::domain::service::PatronServiceImpl;
use crate::patrons::repository::ddb_patron_repository::DDBPatronRepository;
use crate::patrons::repository::memory_patron_repository::MemoryPatronRepository;
use crate::patrons::repository::PatronRepository;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_patron_repository(store: RepositoryStore) -> Box<dyn PatronRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBPatronRepository::new(client, "patrons", "patrons_ndx"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "patrons", "patron_id", "library_id", "authorization_identifier").await;
            Box::new(DDBPatronRepository::new(client, "patrons", "patrons_ndx"))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryPatronRepository::new())
        }
    }
}

pub async fn create_patron_service(store: RepositoryStore) -> Box<dyn PatronService> {
    Box::new(PatronServiceImpl::new(create_patron_repository(store).await))
}
