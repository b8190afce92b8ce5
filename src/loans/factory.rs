use crate::core::repository::RepositoryStore;
use crate::loans::domain::LoanService;
use crate::loans::domain::service::LoanServiceImpl;
use crate::loans::repository::ddb_loan_repository::DDBLoanRepository;
use crate::loans::repository::LoanRepository;
use crate::loans::repository::memory_loan_repository::MemoryLoanRepository;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_loan_repository(store: RepositoryStore) -> Box<dyn LoanRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBLoanRepository::new(client, "loans", "loans_ndx"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "loans", "loan_id", "patron_id", "pool_id").await;
            Box::new(DDBLoanRepository::new(client, "loans", "loans_ndx"))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryLoanRepository::new())
        }
    }
}

pub async fn create_loan_service(store: RepositoryStore) -> Box<dyn LoanService> {
    Box::new(LoanServiceImpl::new(create_loan_repository(store).await))
}
