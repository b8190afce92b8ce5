use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::patrons::Patron;
use crate::utils::date::{opt_serializer, serializer};

// PatronDto carries a patron's identity and standing across service boundaries.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PatronDto {
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

impl PatronDto {
    pub fn new(library_id: &str, authorization_identifier: &str) -> Self {
        Self {
            patron_id: Uuid::new_v4().to_string(),
            version: 0,
            library_id: library_id.to_string(),
            authorization_identifier: authorization_identifier.to_string(),
            external_type: None,
            fines: 0.0,
            authorization_expires: None,
            block_reason: None,
            blocked_until: None,
            last_external_sync: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for PatronDto {
    fn id(&self) -> String {
        self.patron_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Patron for PatronDto {
    fn library_id(&self) -> String {
        self.library_id.to_string()
    }

    fn external_type(&self) -> Option<String> {
        self.external_type.clone()
    }

    fn fines(&self) -> f64 {
        self.fines
    }

    fn authorization_expires(&self) -> Option<NaiveDateTime> {
        self.authorization_expires
    }

    fn block_reason(&self) -> Option<String> {
        self.block_reason.clone()
    }

    fn blocked_until(&self) -> Option<NaiveDateTime> {
        self.blocked_until
    }

    fn last_external_sync(&self) -> Option<NaiveDateTime> {
        self.last_external_sync
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::patrons::Patron;
    use crate::patrons::dto::PatronDto;

    #[tokio::test]
    async fn test_should_build_patron() {
        let patron = PatronDto::new("main", "2391");
        assert_eq!("main", patron.library_id.as_str());
        assert_eq!(0.0, patron.fines);
        assert!(patron.has_borrowing_privileges(Utc::now().naive_utc()));
    }

    #[tokio::test]
    async fn test_should_need_sync_when_never_synced() {
        let patron = PatronDto::new("main", "2391");
        assert!(patron.needs_external_sync(Utc::now().naive_utc()));
    }

    #[tokio::test]
    async fn test_should_need_sync_after_twelve_hours() {
        let now = Utc::now().naive_utc();
        let mut patron = PatronDto::new("main", "2391");
        patron.last_external_sync = Some(now - Duration::hours(1));
        assert!(!patron.needs_external_sync(now));
        patron.last_external_sync = Some(now - Duration::hours(13));
        assert!(patron.needs_external_sync(now));
    }

    #[tokio::test]
    async fn test_should_resync_quickly_without_privileges() {
        let now = Utc::now().naive_utc();
        let mut patron = PatronDto::new("main", "2391");
        patron.authorization_expires = Some(now - Duration::days(1));
        patron.last_external_sync = Some(now - Duration::seconds(2));
        assert!(!patron.needs_external_sync(now));
        patron.last_external_sync = Some(now - Duration::seconds(6));
        assert!(patron.needs_external_sync(now));
    }

    #[tokio::test]
    async fn test_should_check_block_window() {
        let now = Utc::now().naive_utc();
        let mut patron = PatronDto::new("main", "2391");
        patron.block_reason = Some("excessive fines".to_string());
        assert!(patron.is_blocked(now));
        patron.blocked_until = Some(now - Duration::minutes(1));
        assert!(!patron.is_blocked(now));
        patron.blocked_until = Some(now + Duration::days(2));
        assert!(!patron.has_borrowing_privileges(now));
        assert!(!patron.is_expired(now));
    }
}
