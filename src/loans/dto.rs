use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::utils::date::{opt_serializer, serializer};
use crate::works::dto::LicensePoolDto;

// LoanDto is the local mirror of an active checkout the licensor confirmed.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanDto {
    pub loan_id: String,
    pub version: i64,
    pub library_id: String,
    pub patron_id: String,
    pub pool_id: String,
    pub licensor: String,
    pub identifier_type: String,
    pub identifier: String,
    // bound on first successful fulfillment and immutable afterwards
    pub mechanism_id: Option<String>,
    pub external_identifier: Option<String>,
    #[serde(with = "serializer")]
    pub start: NaiveDateTime,
    // none means the loan never ends
    #[serde(with = "opt_serializer", default)]
    pub end: Option<NaiveDateTime>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl LoanDto {
    pub fn new(patron_id: &str, pool: &LicensePoolDto, start: NaiveDateTime, end: Option<NaiveDateTime>) -> Self {
        Self {
            loan_id: Uuid::new_v4().to_string(),
            version: 0,
            library_id: pool.library_id.to_string(),
            patron_id: patron_id.to_string(),
            pool_id: pool.pool_id.to_string(),
            licensor: pool.licensor.to_string(),
            identifier_type: pool.identifier_type.to_string(),
            identifier: pool.identifier.to_string(),
            mechanism_id: None,
            external_identifier: None,
            start,
            end,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        self.end.map(|end| end > now).unwrap_or(true)
    }
}

impl Identifiable for LoanDto {
    fn id(&self) -> String {
        self.loan_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::core::library::Audience;
    use crate::loans::dto::LoanDto;
    use crate::works::dto::{LicensePoolDto, WorkDto};

    #[tokio::test]
    async fn test_should_build_loan_from_pool() {
        let pool = LicensePoolDto::new("main", "overdrive", "ISBN", "9780441478125", WorkDto::new("Lathe of Heaven", Audience::Adult));
        let now = Utc::now().naive_utc();
        let loan = LoanDto::new("p1", &pool, now, Some(now + Duration::days(14)));
        assert_eq!(pool.pool_id, loan.pool_id);
        assert_eq!("overdrive", loan.licensor.as_str());
        assert_eq!(None, loan.mechanism_id);
        assert!(loan.is_active(now));
        assert!(!loan.is_active(now + Duration::days(15)));
    }
}
