use std::collections::HashMap;
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::ddb_table::DDBTable;
use crate::works::domain::model::LicensePoolEntity;
use crate::works::repository::LicensePoolRepository;

#[derive(Debug)]
pub(crate) struct DDBPoolRepository {
    table: DDBTable<LicensePoolEntity>,
}

impl DDBPoolRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            table: DDBTable::new(client, table_name, index_name, "pool_id", "identifier", "library_id"),
        }
    }
}

#[async_trait]
impl Repository<LicensePoolEntity> for DDBPoolRepository {
    async fn create(&self, entity: &LicensePoolEntity) -> LibraryResult<usize> {
        self.table.create(entity).await
    }

    async fn update(&self, entity: &LicensePoolEntity) -> LibraryResult<usize> {
        self.table.update(entity).await
    }

    async fn get(&self, id: &str) -> LibraryResult<LicensePoolEntity> {
        self.table.get(id).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        self.table.delete(id).await
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<LicensePoolEntity>> {
        self.table.query(predicate, page, page_size).await
    }
}

impl LicensePoolRepository for DDBPoolRepository {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use chrono::Utc;
    use lazy_static::lazy_static;
    use uuid::Uuid;
    use crate::core::library::Audience;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::utils::ddb::{build_db_client, create_table, delete_table};
    use crate::works::domain::model::{DeliveryMechanismEntity, LicensePoolEntity};
    use crate::works::repository::ddb_pool_repository::DDBPoolRepository;

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, "license_pools").await;
                let _ = create_table(&client, "license_pools", "pool_id", "identifier", "library_id").await;
                client
            });
    }

    #[tokio::test]
    #[ignore = "needs DynamoDB Local on localhost:8000"]
    async fn test_should_store_pool_with_mechanisms() {
        let repo = DDBPoolRepository::new(CLIENT.get().await.clone(), "license_pools", "license_pools_ndx");
        let pool = LicensePoolEntity {
            pool_id: Uuid::new_v4().to_string(),
            version: 0,
            library_id: "main".to_string(),
            licensor: "overdrive".to_string(),
            identifier_type: "ISBN".to_string(),
            identifier: "9780441478125".to_string(),
            work_id: Uuid::new_v4().to_string(),
            title: "The Dispossessed".to_string(),
            audience: Audience::Adult,
            licenses_owned: 2,
            licenses_available: 1,
            patrons_in_hold_queue: 0,
            open_access: false,
            delivery_mechanisms: vec![DeliveryMechanismEntity {
                mechanism_id: "epub".to_string(),
                content_type: "application/epub+zip".to_string(),
                drm_scheme: Some("Adobe DRM".to_string()),
                is_streaming: false,
                download_url: None,
            }],
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        };
        repo.create(&pool).await.expect("should create pool");
        let loaded = repo.get(pool.pool_id.as_str()).await.expect("should get pool");
        assert_eq!(pool.delivery_mechanisms, loaded.delivery_mechanisms);
        let res = repo.query(&HashMap::from([
            ("identifier".to_string(), "9780441478125".to_string()),
            ("library_id".to_string(), "main".to_string()),
            ("identifier_type".to_string(), "ISBN".to_string())]), None, 10).await.expect("should query pools");
        assert_eq!(1, res.records.len());
    }
}
