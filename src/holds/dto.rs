use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::HoldStatus;
use crate::utils::date::{opt_serializer, serializer};
use crate::works::dto::LicensePoolDto;

// HoldDto is the local mirror of a queued request the licensor confirmed.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct HoldDto {
    pub hold_id: String,
    pub version: i64,
    pub library_id: String,
    pub patron_id: String,
    pub pool_id: String,
    pub licensor: String,
    pub identifier_type: String,
    pub identifier: String,
    // unknown until the licensor reports it
    pub position: Option<i64>,
    pub hold_status: HoldStatus,
    #[serde(with = "serializer")]
    pub start: NaiveDateTime,
    #[serde(with = "opt_serializer", default)]
    pub end: Option<NaiveDateTime>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl HoldDto {
    pub fn new(patron_id: &str, pool: &LicensePoolDto, start: NaiveDateTime, position: Option<i64>) -> Self {
        Self {
            hold_id: Uuid::new_v4().to_string(),
            version: 0,
            library_id: pool.library_id.to_string(),
            patron_id: patron_id.to_string(),
            pool_id: pool.pool_id.to_string(),
            licensor: pool.licensor.to_string(),
            identifier_type: pool.identifier_type.to_string(),
            identifier: pool.identifier.to_string(),
            position,
            hold_status: HoldStatus::Queued,
            start,
            end: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    // a reserved hold has a copy set aside and can no longer be released
    pub fn is_reserved(&self) -> bool {
        self.hold_status == HoldStatus::Reserved
    }
}

impl Identifiable for HoldDto {
    fn id(&self) -> String {
        self.hold_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
