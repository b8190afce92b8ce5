use std::collections::HashMap;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;
use crate::utils::ddb_table::DDBTable;

#[derive(Debug)]
pub(crate) struct DDBLoanRepository {
    table: DDBTable<LoanEntity>,
}

impl DDBLoanRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            table: DDBTable::new(client, table_name, index_name, "loan_id", "patron_id", "pool_id"),
        }
    }
}

#[async_trait]
impl Repository<LoanEntity> for DDBLoanRepository {
    async fn create(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        self.table.create(entity).await
    }

    async fn update(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        self.table.update(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<LoanEntity> {
        self.table.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.table.delete(id).await
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
        self.table.query(predicate, page, page_size).await
    }
}

impl LoanRepository for DDBLoanRepository {}
