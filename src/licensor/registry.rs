use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use crate::core::domain::{LicensorProtocol, Settings};
use crate::core::library::{LibraryError, LibraryResult};
use crate::licensor::LicensorApi;
use crate::licensor::open_access::OpenAccessLicensor;

// LicensorRegistry maps (library, licensor name) to the adapter serving it.
#[derive(Clone, Default)]
pub struct LicensorRegistry {
    licensors: HashMap<(String, String), Arc<dyn LicensorApi>>,
}

impl LicensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // registers the built-in adapters; vendor adapters are added with `register`
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registry = Self::new();
        for library in &settings.libraries {
            for collection in &library.collections {
                match collection.protocol {
                    LicensorProtocol::OpenAccess => {
                        registry.register(library.library_id.as_str(),
                                          Arc::new(OpenAccessLicensor::new(collection.licensor.as_str())));
                    }
                    LicensorProtocol::External => {
                        warn!(library_id = library.library_id.as_str(), licensor = collection.licensor.as_str(),
                            "no built-in adapter for licensor, register one before serving it");
                    }
                }
            }
        }
        registry
    }

    pub fn register(&mut self, library_id: &str, licensor: Arc<dyn LicensorApi>) {
        self.licensors.insert((library_id.to_string(), licensor.name()), licensor);
    }

    pub fn get(&self, library_id: &str, licensor: &str) -> LibraryResult<Arc<dyn LicensorApi>> {
        self.licensors.get(&(library_id.to_string(), licensor.to_string())).cloned()
            .ok_or_else(|| LibraryError::remote_integration(
                format!("no licensor {} configured for library {}", licensor, library_id).as_str(), licensor))
    }

    pub fn for_library(&self, library_id: &str) -> Vec<Arc<dyn LicensorApi>> {
        let mut licensors: Vec<(&String, &Arc<dyn LicensorApi>)> = self.licensors.iter()
            .filter(|((library, _), _)| library == library_id)
            .map(|((_, name), api)| (name, api))
            .collect();
        licensors.sort_by(|a, b| a.0.cmp(b.0));
        licensors.into_iter().map(|(_, api)| api.clone()).collect()
    }
}
