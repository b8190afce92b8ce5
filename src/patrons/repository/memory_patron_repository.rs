use std::collections::HashMap;
use async_trait::async_trait;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::repository::PatronRepository;
use crate::utils::memory::MemoryStore;

#[derive(Debug)]
pub(crate) struct MemoryPatronRepository {
    store: MemoryStore<PatronEntity>,
}

impl MemoryPatronRepository {
    pub(crate) fn new() -> Self {
        Self { store: MemoryStore::new("patrons") }
    }
}

#[async_trait]
impl Repository<PatronEntity> for MemoryPatronRepository {
    async fn create(&self, entity: &PatronEntity) -> LibraryResult<usize> {
        self.store.create(entity).await
    }

    async fn update(&self, entity: &PatronEntity) -> LibraryResult<usize> {
        self.store.update(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<PatronEntity> {
        self.store.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.store.delete(id).await
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<PatronEntity>> {
        self.store.query(predicate, page, page_size).await
    }
}

impl PatronRepository for MemoryPatronRepository {}
