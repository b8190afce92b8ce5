use std::collections::HashMap;
use async_trait::async_trait;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::memory::MemoryStore;
use crate::holds::domain::model::HoldEntity;
use crate::holds::repository::HoldRepository;

#[derive(Debug)]
pub(crate) struct MemoryHoldRepository {
    store: MemoryStore<HoldEntity>,
}

impl MemoryHoldRepository {
    pub(crate) fn new() -> Self {
        Self { store: MemoryStore::new("holds") }
    }
}

#[async_trait]
impl Repository<HoldEntity> for MemoryHoldRepository {
    async fn create(&self, entity: &HoldEntity) -> LibraryResult<usize> {
        self.store.create(entity).await
    }

    async fn update(&self, entity: &HoldEntity) -> LibraryResult<usize> {
        self.store.update(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<HoldEntity> {
        self.store.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.store.delete(id).await
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<HoldEntity>> {
        self.store.query(predicate, page, page_size).await
    }
}

impl HoldRepository for MemoryHoldRepository {}
