use std::collections::HashMap;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::repository::PatronRepository;
use crate::utils::ddb_table::DDBTable;

#[derive(Debug)]
pub(crate) struct DDBPatronRepository {
    table: DDBTable<PatronEntity>,
}

impl DDBPatronRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            table: DDBTable::new(client, table_name, index_name,
                                 "patron_id", "library_id", "authorization_identifier"),
        }
    }
}

#[async_trait]
impl Repository<PatronEntity> for DDBPatronRepository {
    async fn create(&self, entity: &PatronEntity) -> LibraryResult<usize> {
        self.table.create(entity).await
    }

    async fn update(&self, entity: &PatronEntity) -> LibraryResult<usize> {
        self.table.update(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<PatronEntity> {
        self.table.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.table.delete(id).await
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<PatronEntity>> {
        self.table.query(predicate, page, page_size).await
    }
}

impl PatronRepository for DDBPatronRepository {}
