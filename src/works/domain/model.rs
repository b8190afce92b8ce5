use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::Audience;
use crate::utils::date::serializer;
use crate::utils::memory::Record;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct DeliveryMechanismEntity {
    pub mechanism_id: String,
    pub content_type: String,
    pub drm_scheme: Option<String>,
    pub is_streaming: bool,
    pub download_url: Option<String>,
}

// LicensePoolEntity is the stored form of a license pool, with its work inlined.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct LicensePoolEntity {
    pub pool_id: String,
    pub version: i64,
    pub library_id: String,
    pub licensor: String,
    pub identifier_type: String,
    pub identifier: String,
    pub work_id: String,
    pub title: String,
    pub audience: Audience,
    pub licenses_owned: i64,
    pub licenses_available: i64,
    pub patrons_in_hold_queue: i64,
    pub open_access: bool,
    pub delivery_mechanisms: Vec<DeliveryMechanismEntity>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl Identifiable for LicensePoolEntity {
    fn id(&self) -> String {
        self.pool_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Record for LicensePoolEntity {
    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "library_id" => Some(self.library_id.to_string()),
            "licensor" => Some(self.licensor.to_string()),
            "identifier_type" => Some(self.identifier_type.to_string()),
            "identifier" => Some(self.identifier.to_string()),
            _ => None,
        }
    }
}
