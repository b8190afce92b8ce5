use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::Audience;
use crate::utils::date::serializer;

// WorkDto is the title a license pool offers.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct WorkDto {
    pub work_id: String,
    pub title: String,
    pub audience: Audience,
}

impl WorkDto {
    pub fn new(title: &str, audience: Audience) -> Self {
        Self {
            work_id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            audience,
        }
    }
}

// DeliveryMechanismDto is a (content type, DRM scheme) pair a pool can fulfill through.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DeliveryMechanismDto {
    pub mechanism_id: String,
    pub content_type: String,
    pub drm_scheme: Option<String>,
    pub is_streaming: bool,
    // only open-access pools carry a public download location
    pub download_url: Option<String>,
}

impl DeliveryMechanismDto {
    pub fn new(mechanism_id: &str, content_type: &str, drm_scheme: Option<&str>) -> Self {
        Self {
            mechanism_id: mechanism_id.to_string(),
            content_type: content_type.to_string(),
            drm_scheme: drm_scheme.map(str::to_string),
            is_streaming: false,
            download_url: None,
        }
    }
}

// PoolAvailability is the licensor's answer to "how many copies are there right now".
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct PoolAvailability {
    pub licenses_owned: i64,
    pub licenses_available: i64,
    pub patrons_in_hold_queue: i64,
}

// LicensePoolDto is one licensor's offering of a work to one library.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LicensePoolDto {
    pub pool_id: String,
    pub version: i64,
    pub library_id: String,
    pub licensor: String,
    pub identifier_type: String,
    pub identifier: String,
    pub work: WorkDto,
    pub licenses_owned: i64,
    pub licenses_available: i64,
    pub patrons_in_hold_queue: i64,
    pub open_access: bool,
    pub delivery_mechanisms: Vec<DeliveryMechanismDto>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl LicensePoolDto {
    pub fn new(library_id: &str, licensor: &str, identifier_type: &str, identifier: &str, work: WorkDto) -> Self {
        Self {
            pool_id: Uuid::new_v4().to_string(),
            version: 0,
            library_id: library_id.to_string(),
            licensor: licensor.to_string(),
            identifier_type: identifier_type.to_string(),
            identifier: identifier.to_string(),
            work,
            licenses_owned: 0,
            licenses_available: 0,
            patrons_in_hold_queue: 0,
            open_access: false,
            delivery_mechanisms: vec![],
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    pub fn mechanism(&self, mechanism_id: &str) -> Option<&DeliveryMechanismDto> {
        self.delivery_mechanisms.iter().find(|m| m.mechanism_id == mechanism_id)
    }

    // open-access pools never run out
    pub fn effective_available(&self) -> i64 {
        if self.open_access {
            i64::MAX
        } else {
            self.licenses_available
        }
    }

    pub fn has_copies(&self) -> bool {
        self.effective_available() > 0
    }

    pub fn is_consistent(&self) -> bool {
        self.open_access || (self.licenses_available >= 0 && self.licenses_available <= self.licenses_owned
            && self.patrons_in_hold_queue >= 0)
    }

    // counters come only from the licensor; the available count is clamped so
    // a sloppy report cannot break the owned/available invariant
    pub fn apply(&mut self, availability: &PoolAvailability) {
        self.licenses_owned = availability.licenses_owned.max(0);
        self.licenses_available = if self.open_access {
            availability.licenses_available.max(0)
        } else {
            availability.licenses_available.clamp(0, self.licenses_owned)
        };
        self.patrons_in_hold_queue = availability.patrons_in_hold_queue.max(0);
        self.updated_at = Utc::now().naive_utc();
    }
}

impl Identifiable for LicensePoolDto {
    fn id(&self) -> String {
        self.pool_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::Audience;
    use crate::works::dto::{DeliveryMechanismDto, LicensePoolDto, PoolAvailability, WorkDto};

    fn pool() -> LicensePoolDto {
        let mut pool = LicensePoolDto::new("main", "overdrive", "ISBN", "9780262510875",
                                           WorkDto::new("Structure and Interpretation", Audience::Adult));
        pool.delivery_mechanisms.push(DeliveryMechanismDto::new("epub-acs", "application/epub+zip", Some("Adobe DRM")));
        pool
    }

    #[tokio::test]
    async fn test_should_find_mechanism() {
        let pool = pool();
        assert!(pool.mechanism("epub-acs").is_some());
        assert!(pool.mechanism("pdf").is_none());
    }

    #[tokio::test]
    async fn test_should_clamp_availability() {
        let mut pool = pool();
        pool.apply(&PoolAvailability { licenses_owned: 2, licenses_available: 5, patrons_in_hold_queue: -1 });
        assert_eq!(2, pool.licenses_available);
        assert_eq!(0, pool.patrons_in_hold_queue);
        assert!(pool.is_consistent());
        assert!(pool.has_copies());
    }

    #[tokio::test]
    async fn test_should_treat_open_access_as_unlimited() {
        let mut pool = pool();
        pool.open_access = true;
        assert!(pool.has_copies());
        assert_eq!(i64::MAX, pool.effective_available());
        assert!(pool.is_consistent());
    }
}
