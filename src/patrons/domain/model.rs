use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::utils::date::{opt_serializer, serializer};
use crate::utils::memory::Record;

// PatronEntity is the stored form of a patron.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct PatronEntity {
    pub patron_id: String,
    pub version: i64,
    pub library_id: String,
    pub authorization_identifier: String,
    pub external_type: Option<String>,
    pub fines: f64,
    #[serde(with = "opt_serializer", default)]
    pub authorization_expires: Option<NaiveDateTime>,
    pub block_reason: Option<String>,
    #[serde(with = "opt_serializer", default)]
    pub blocked_until: Option<NaiveDateTime>,
    #[serde(with = "opt_serializer", default)]
    pub last_external_sync: Option<NaiveDateTime>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl Identifiable for PatronEntity {
    fn id(&self) -> String {
        self.patron_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Record for PatronEntity {
    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "library_id" => Some(self.library_id.to_string()),
            "authorization_identifier" => Some(self.authorization_identifier.to_string()),
            "external_type" => self.external_type.clone(),
            _ => None,
        }
    }
}
