use std::collections::HashMap;
use async_trait::async_trait;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::memory::MemoryStore;
use crate::loans::domain::model::LoanEntity;
use crate::loans::repository::LoanRepository;

#[derive(Debug)]
pub(crate) struct MemoryLoanRepository {
    store: MemoryStore<LoanEntity>,
}

impl MemoryLoanRepository {
    pub(crate) fn new() -> Self {
        Self { store: MemoryStore::new("loans") }
    }
}

#[async_trait]
impl Repository<LoanEntity> for MemoryLoanRepository {
    async fn create(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        self.store.create(entity).await
    }

    async fn update(&self, entity: &LoanEntity) -> LibraryResult<usize> {
        self.store.update(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<LoanEntity> {
        self.store.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.store.delete(id).await
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LoanEntity>> {
        self.store.query(predicate, page, page_size).await
    }
}

impl LoanRepository for MemoryLoanRepository {}
