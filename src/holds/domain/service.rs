use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;
use crate::core::library::LibraryResult;
use crate::holds::domain::HoldService;
use crate::holds::domain::model::HoldEntity;
use crate::holds::dto::HoldDto;
use crate::holds::repository::HoldRepository;

pub(crate) struct HoldServiceImpl {
    hold_repository: Box<dyn HoldRepository>,
}

impl HoldServiceImpl {
    pub(crate) fn new(hold_repository: Box<dyn HoldRepository>) -> Self {
        Self {
            hold_repository,
        }
    }
}

#[async_trait]
impl HoldService for HoldServiceImpl {
    async fn add_hold(&self, hold: &HoldDto) -> LibraryResult<()> {
        self.hold_repository.create(&HoldEntity::from(hold)).await.map(|_| ())
    }

    async fn update_hold(&self, hold: &HoldDto) -> LibraryResult<HoldDto> {
        let mut entity = HoldEntity::from(hold);
        entity.updated_at = Utc::now().naive_utc();
        self.hold_repository.update(&entity).await?;
        entity.version += 1;
        Ok(HoldDto::from(&entity))
    }

    async fn remove_hold(&self, hold_id: &str) -> LibraryResult<()> {
        self.hold_repository.delete(hold_id).await.map(|_| ())
    }

    async fn find_hold(&self, patron_id: &str, pool_id: &str) -> LibraryResult<Option<HoldDto>> {
        let res = self.hold_repository.query(
            &HashMap::from([("patron_id".to_string(), patron_id.to_string()),
                ("pool_id".to_string(), pool_id.to_string())]), None, 10).await?;
        Ok(res.records.first().map(HoldDto::from))
    }

    async fn find_holds_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<HoldDto>> {
        let predicate = HashMap::from([("patron_id".to_string(), patron_id.to_string())]);
        let mut holds = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = self.hold_repository.query(&predicate, next_page.as_deref(), 100).await?;
            holds.extend(res.records.iter().map(HoldDto::from));
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        Ok(holds)
    }
}

impl From<&HoldEntity> for HoldDto {
    fn from(other: &HoldEntity) -> Self {
        Self {
            hold_id: other.hold_id.to_string(),
            version: other.version,
            library_id: other.library_id.to_string(),
            patron_id: other.patron_id.to_string(),
            pool_id: other.pool_id.to_string(),
            licensor: other.licensor.to_string(),
            identifier_type: other.identifier_type.to_string(),
            identifier: other.identifier.to_string(),
            position: other.position,
            hold_status: other.hold_status,
            start: other.start,
            end: other.end,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&HoldDto> for HoldEntity {
    fn from(other: &HoldDto) -> Self {
        Self {
            hold_id: other.hold_id.to_string(),
            version: other.version,
            library_id: other.library_id.to_string(),
            patron_id: other.patron_id.to_string(),
            pool_id: other.pool_id.to_string(),
            licensor: other.licensor.to_string(),
            identifier_type: other.identifier_type.to_string(),
            identifier: other.identifier.to_string(),
            position: other.position,
            hold_status: other.hold_status,
            start: other.start,
            end: other.end,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}
