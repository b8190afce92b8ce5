use std::collections::HashMap;
use async_trait::async_trait;
use tracing::warn;
use crate::core::library::{LibraryError, LibraryResult};
use crate::works::domain::CatalogService;
use crate::works::domain::model::{DeliveryMechanismEntity, LicensePoolEntity};
use crate::works::dto::{DeliveryMechanismDto, LicensePoolDto, PoolAvailability, WorkDto};
use crate::works::repository::LicensePoolRepository;

const MAX_UPDATE_ATTEMPTS: usize = 3;

pub(crate) struct CatalogServiceImpl {
    pool_repository: Box<dyn LicensePoolRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(pool_repository: Box<dyn LicensePoolRepository>) -> Self {
        Self {
            pool_repository,
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_pool(&self, pool: &LicensePoolDto) -> LibraryResult<()> {
        if !pool.is_consistent() {
            return Err(LibraryError::validation(
                format!("pool {} has {} of {} licenses available", pool.pool_id,
                        pool.licenses_available, pool.licenses_owned).as_str(), Some("400".to_string())));
        }
        self.pool_repository.create(&LicensePoolEntity::from(pool)).await.map(|_| ())
    }

    async fn find_pool(&self, pool_id: &str) -> LibraryResult<LicensePoolDto> {
        self.pool_repository.get(pool_id).await.map(|p| LicensePoolDto::from(&p))
    }

    async fn find_pools(&self, library_id: &str, identifier_type: &str, identifier: &str) -> LibraryResult<Vec<LicensePoolDto>> {
        let predicate = HashMap::from([
            ("identifier".to_string(), identifier.to_string()),
            ("library_id".to_string(), library_id.to_string()),
            ("identifier_type".to_string(), identifier_type.to_string())]);
        let mut pools = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = self.pool_repository.query(&predicate, next_page.as_deref(), 100).await?;
            pools.extend(res.records.iter().map(LicensePoolDto::from));
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        Ok(pools)
    }

    // retried on version conflicts since concurrent borrows of one pool all report counts
    async fn apply_availability(&self, pool_id: &str, availability: &PoolAvailability) -> LibraryResult<LicensePoolDto> {
        let mut last_err = None;
        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let mut pool = LicensePoolDto::from(&self.pool_repository.get(pool_id).await?);
            pool.apply(availability);
            match self.pool_repository.update(&LicensePoolEntity::from(&pool)).await {
                Ok(_) => {
                    pool.version += 1;
                    return Ok(pool);
                }
                Err(err @ LibraryError::Database { retryable: false, .. }) => {
                    warn!(pool_id = pool_id, error = %err, "pool changed while recording availability, retrying");
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err.unwrap_or_else(|| LibraryError::runtime("failed to record availability", None)))
    }
}

impl From<&LicensePoolEntity> for LicensePoolDto {
    fn from(other: &LicensePoolEntity) -> Self {
        Self {
            pool_id: other.pool_id.to_string(),
            version: other.version,
            library_id: other.library_id.to_string(),
            licensor: other.licensor.to_string(),
            identifier_type: other.identifier_type.to_string(),
            identifier: other.identifier.to_string(),
            work: WorkDto {
                work_id: other.work_id.to_string(),
                title: other.title.to_string(),
                audience: other.audience,
            },
            licenses_owned: other.licenses_owned,
            licenses_available: other.licenses_available,
            patrons_in_hold_queue: other.patrons_in_hold_queue,
            open_access: other.open_access,
            delivery_mechanisms: other.delivery_mechanisms.iter().map(DeliveryMechanismDto::from).collect(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&LicensePoolDto> for LicensePoolEntity {
    fn from(other: &LicensePoolDto) -> Self {
        Self {
            pool_id: other.pool_id.to_string(),
            version: other.version,
            library_id: other.library_id.to_string(),
            licensor: other.licensor.to_string(),
            identifier_type: other.identifier_type.to_string(),
            identifier: other.identifier.to_string(),
            work_id: other.work.work_id.to_string(),
            title: other.work.title.to_string(),
            audience: other.work.audience,
            licenses_owned: other.licenses_owned,
            licenses_available: other.licenses_available,
            patrons_in_hold_queue: other.patrons_in_hold_queue,
            open_access: other.open_access,
            delivery_mechanisms: other.delivery_mechanisms.iter().map(DeliveryMechanismEntity::from).collect(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&DeliveryMechanismEntity> for DeliveryMechanismDto {
    fn from(other: &DeliveryMechanismEntity) -> Self {
        Self {
            mechanism_id: other.mechanism_id.to_string(),
            content_type: other.content_type.to_string(),
            drm_scheme: other.drm_scheme.clone(),
            is_streaming: other.is_streaming,
            download_url: other.download_url.clone(),
        }
    }
}

impl From<&DeliveryMechanismDto> for DeliveryMechanismEntity {
    fn from(other: &DeliveryMechanismDto) -> Self {
        Self {
            mechanism_id: other.mechanism_id.to_string(),
            content_type: other.content_type.to_string(),
            drm_scheme: other.drm_scheme.clone(),
            is_streaming: other.is_streaming,
            download_url: other.download_url.clone(),
        }
    }
}
