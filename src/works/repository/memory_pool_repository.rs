use std::collections::HashMap;
use async_trait::async_trait;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::memory::MemoryStore;
use crate::works::domain::model::LicensePoolEntity;
use crate::works::repository::LicensePoolRepository;

#[derive(Debug)]
pub(crate) struct MemoryPoolRepository {
    store: MemoryStore<LicensePoolEntity>,
}

impl MemoryPoolRepository {
    pub(crate) fn new() -> Self {
        Self { store: MemoryStore::new("license_pools") }
    }
}

#[async_trait]
impl Repository<LicensePoolEntity> for MemoryPoolRepository {
    async fn create(&self, entity: &LicensePoolEntity) -> LibraryResult<usize> {
        self.store.create(entity).await
    }

    async fn update(&self, entity: &LicensePoolEntity) -> LibraryResult<usize> {
        self.store.update(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<LicensePoolEntity> {
        self.store.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.store.delete(id).await
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LicensePoolEntity>> {
        self.store.query(predicate, page, page_size).await
    }
}

impl LicensePoolRepository for MemoryPoolRepository {}
