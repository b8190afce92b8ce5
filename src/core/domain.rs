use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::library::{Audience, LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;
use crate::gateway::GatewayPublisherVia;
use crate::patrons::dto::PatronDto;

pub const SETTINGS_ENV: &str = "CIRCULATION_SETTINGS";

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

// LendingPolicy restricts which audiences a patron of a given external type may borrow.
// Patrons whose external type is not listed may borrow anything.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Default)]
pub struct LendingPolicy {
    #[serde(default)]
    pub audiences_by_external_type: HashMap<String, Vec<Audience>>,
}

impl LendingPolicy {
    pub fn allows(&self, external_type: Option<&str>, audience: Audience) -> bool {
        match external_type.and_then(|t| self.audiences_by_external_type.get(t)) {
            Some(audiences) => audiences.contains(&audience),
            None => true,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum LicensorProtocol {
    OpenAccess,
    // Vendor adapters are registered by the embedding application.
    #[serde(other)]
    External,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct CollectionConfig {
    pub licensor: String,
    pub protocol: LicensorProtocol,
}

// Configuration abstracts per-library lending policy; read-only once loaded.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub library_id: String,
    #[serde(default = "default_allow_holds")]
    pub allow_holds: bool,
    #[serde(default)]
    pub fine_ceiling: Option<f64>,
    #[serde(default)]
    pub max_loans: Option<usize>,
    #[serde(default = "default_max_holds")]
    pub max_holds: Option<usize>,
    #[serde(default)]
    pub lending_policy: LendingPolicy,
    #[serde(default = "default_sync_grace_seconds")]
    pub sync_grace_seconds: i64,
    #[serde(default)]
    pub collections: Vec<CollectionConfig>,
}

fn default_allow_holds() -> bool {
    true
}

fn default_max_holds() -> Option<usize> {
    Some(4)
}

fn default_sync_grace_seconds() -> i64 {
    60
}

impl Configuration {
    pub fn new(library_id: &str) -> Self {
        Configuration {
            library_id: library_id.to_string(),
            allow_holds: default_allow_holds(),
            fine_ceiling: None,
            max_loans: None,
            max_holds: default_max_holds(),
            lending_policy: LendingPolicy::default(),
            sync_grace_seconds: default_sync_grace_seconds(),
            collections: vec![],
        }
    }
}

// Settings is the process-wide configuration: where state lives, where events
// go, and the policy of every library served by this process.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub store: RepositoryStore,
    #[serde(default)]
    pub publisher: Option<GatewayPublisherVia>,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    pub libraries: Vec<Configuration>,
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Settings {
    pub fn dev() -> Self {
        let mut library = Configuration::new("dev");
        library.collections.push(CollectionConfig {
            licensor: "open-access".to_string(),
            protocol: LicensorProtocol::OpenAccess,
        });
        Settings {
            store: RepositoryStore::Memory,
            publisher: Some(GatewayPublisherVia::Logs),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            libraries: vec![library],
        }
    }

    pub fn from_json(json: &str) -> LibraryResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        if settings.libraries.is_empty() {
            return Err(LibraryError::validation("settings must declare at least one library", None));
        }
        Ok(settings)
    }

    // loads settings from the file named by CIRCULATION_SETTINGS, or the dev defaults
    pub fn load() -> LibraryResult<Self> {
        match std::env::var(SETTINGS_ENV) {
            Ok(path) => {
                let json = std::fs::read_to_string(path)?;
                Settings::from_json(json.as_str())
            }
            Err(_) => Ok(Settings::dev()),
        }
    }

    pub fn library(&self, library_id: &str) -> Option<&Configuration> {
        self.libraries.iter().find(|l| l.library_id == library_id)
    }

    pub fn publisher(&self) -> GatewayPublisherVia {
        self.publisher.clone().unwrap_or_else(|| self.store.gateway_publisher())
    }
}

// RequestContext carries the library and patron a request acts for. It is passed
// explicitly into every circulation call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub library: Configuration,
    pub patron: PatronDto,
    pub credential: Option<String>,
}

impl RequestContext {
    pub fn new(library: &Configuration, patron: PatronDto, credential: Option<String>) -> Self {
        RequestContext {
            request_id: Uuid::new_v4().to_string(),
            library: library.clone(),
            patron,
            credential,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::core::domain::{Configuration, LendingPolicy, LicensorProtocol, Settings};
    use crate::core::library::Audience;
    use crate::core::repository::RepositoryStore;
    use crate::gateway::GatewayPublisherVia;

    #[tokio::test]
    async fn test_should_build_config() {
        let config = Configuration::new("test");
        assert_eq!(Some(4), config.max_holds);
        assert!(config.allow_holds);
        assert_eq!(None, config.fine_ceiling);
        assert_eq!(60, config.sync_grace_seconds);
    }

    #[tokio::test]
    async fn test_should_apply_lending_policy() {
        let policy = LendingPolicy {
            audiences_by_external_type: HashMap::from([
                ("juvenile".to_string(), vec![Audience::Children, Audience::YoungAdult])]),
        };
        assert!(policy.allows(Some("juvenile"), Audience::Children));
        assert!(!policy.allows(Some("juvenile"), Audience::AdultsOnly));
        assert!(policy.allows(Some("adult"), Audience::AdultsOnly));
        assert!(policy.allows(None, Audience::AdultsOnly));
    }

    #[tokio::test]
    async fn test_should_parse_settings() {
        let json = r#"{
            "store": "Memory",
            "libraries": [{
                "library_id": "main",
                "allow_holds": false,
                "fine_ceiling": 10.0,
                "collections": [
                    {"licensor": "gutenberg", "protocol": "OpenAccess"},
                    {"licensor": "vendor", "protocol": "Overdrive"}
                ]
            }]
        }"#;
        let settings = Settings::from_json(json).expect("should parse settings");
        assert_eq!(RepositoryStore::Memory, settings.store);
        assert_eq!(GatewayPublisherVia::Logs, settings.publisher());
        let library = settings.library("main").expect("should find library");
        assert!(!library.allow_holds);
        assert_eq!(Some(10.0), library.fine_ceiling);
        assert_eq!(Some(4), library.max_holds);
        assert_eq!(LicensorProtocol::External, library.collections[1].protocol);
    }

    #[tokio::test]
    async fn test_should_reject_settings_without_libraries() {
        assert!(Settings::from_json(r#"{"store": "Memory", "libraries": []}"#).is_err());
    }
}
