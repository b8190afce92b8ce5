use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::HoldStatus;
use crate::utils::date::{opt_serializer, serializer};
use crate::utils::memory::Record;

// HoldEntity is the stored form of a hold.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct HoldEntity {
    pub hold_id: String,
    pub version: i64,
    pub library_id: String,
    pub patron_id: String,
    pub pool_id: String,
    pub licensor: String,
    pub identifier_type: String,
    pub identifier: String,
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

impl Identifiable for HoldEntity {
    fn id(&self) -> String {
        self.hold_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Record for HoldEntity {
    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "patron_id" => Some(self.patron_id.to_string()),
            "pool_id" => Some(self.pool_id.to_string()),
            "licensor" => Some(self.licensor.to_string()),
            "library_id" => Some(self.library_id.to_string()),
            "hold_status" => Some(self.hold_status.to_string()),
            _ => None,
        }
    }
}
