use std::collections::HashMap;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use crate::core::library::{LibraryError, LibraryResult};
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::domain::PatronService;
use crate::patrons::dto::PatronDto;
use crate::patrons::repository::PatronRepository;

pub(crate) struct PatronServiceImpl {
    patron_repository: Box<dyn PatronRepository>,
}

impl PatronServiceImpl {
    pub(crate) fn new(patron_repository: Box<dyn PatronRepository>) -> Self {
        PatronServiceImpl {
            patron_repository,
        }
    }
}

#[async_trait]
impl PatronService for PatronServiceImpl {
    async fn add_patron(&self, patron: &PatronDto) -> LibraryResult<()> {
        self.patron_repository.create(&PatronEntity::from(patron)).await.map(|_| ())
    }

    async fn update_patron(&self, patron: &PatronDto) -> LibraryResult<()> {
        self.patron_repository.update(&PatronEntity::from(patron)).await.map(|_| ())
    }

    async fn find_patron_by_id(&self, id: &str) -> LibraryResult<PatronDto> {
        self.patron_repository.get(id).await.map(|p| PatronDto::from(&p))
    }

    async fn authenticate(&self, library_id: &str, authorization_identifier: &str) -> LibraryResult<PatronDto> {
        let res = self.patron_repository.query(
            &HashMap::from([("library_id".to_string(), library_id.to_string()),
                ("authorization_identifier".to_string(), authorization_identifier.to_string())]), None, 2).await?;
        match res.records.first() {
            Some(patron) => Ok(PatronDto::from(patron)),
            None => Err(LibraryError::invalid_credentials("Invalid patron credentials.")),
        }
    }

    async fn record_external_sync(&self, patron: &PatronDto, synced_at: NaiveDateTime) -> LibraryResult<PatronDto> {
        let mut entity = self.patron_repository.get(patron.patron_id.as_str()).await?;
        entity.last_external_sync = Some(synced_at);
        entity.updated_at = Utc::now().naive_utc();
        self.patron_repository.update(&entity).await?;
        entity.version += 1;
        Ok(PatronDto::from(&entity))
    }
}

impl From<&PatronEntity> for PatronDto {
    fn from(other: &PatronEntity) -> Self {
        Self {
            patron_id: other.patron_id.to_string(),
            version: other.version,
            library_id: other.library_id.to_string(),
            authorization_identifier: other.authorization_identifier.to_string(),
            external_type: other.external_type.clone(),
            fines: other.fines,
            authorization_expires: other.authorization_expires,
            block_reason: other.block_reason.clone(),
            blocked_until: other.blocked_until,
            last_external_sync: other.last_external_sync,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&PatronDto> for PatronEntity {
    fn from(other: &PatronDto) -> Self {
        Self {
            patron_id: other.patron_id.to_string(),
            version: other.version,
            library_id: other.library_id.to_string(),
            authorization_identifier: other.authorization_identifier.to_string(),
            external_type: other.external_type.clone(),
            fines: other.fines,
            authorization_expires: other.authorization_expires,
            block_reason: other.block_reason.clone(),
            blocked_until: other.blocked_until,
            last_external_sync: other.last_external_sync,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}
