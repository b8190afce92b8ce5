use std::collections::HashMap;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::holds::domain::model::HoldEntity;
use crate::holds::repository::HoldRepository;
use crate::utils::ddb_table::DDBTable;

#[derive(Debug)]
pub(crate) struct DDBHoldRepository {
    table: DDBTable<HoldEntity>,
}

impl DDBHoldRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            table: DDBTable::new(client, table_name, index_name, "hold_id", "patron_id", "pool_id"),
        }
    }
}

#[async_trait]
impl Repository<HoldEntity> for DDBHoldRepository {
    async fn create(&self, entity: &HoldEntity) -> LibraryResult<usize> {
        self.table.create(entity).await
    }

    async fn update(&self, entity: &HoldEntity) -> LibraryResult<usize> {
        self.table.update(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<HoldEntity> {
        self.table.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.table.delete(id).await
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<HoldEntity>> {
        self.table.query(predicate, page, page_size).await
    }
}

impl HoldRepository for DDBHoldRepository {}
