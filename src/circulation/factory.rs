use std::sync::Arc;
use crate::circulation::domain::CirculationService;
use crate::circulation::domain::service::{CirculationServiceImpl, LendingServices};
use crate::core::domain::Settings;
use crate::core::library::LibraryResult;
use crate::delivery::fetcher::HttpContentFetcher;
use crate::delivery::resolver::DeliveryResolver;
use crate::gateway::factory::create_publisher;
use crate::holds::factory::create_hold_service;
use crate::licensor::registry::LicensorRegistry;
use crate::loans::factory::create_loan_service;
use crate::patrons::factory::create_patron_service;
use crate::policy::evaluator::DefaultPolicyEvaluator;
use crate::works::factory::create_catalog_service;

pub(crate) async fn create_lending_services(settings: &Settings) -> LendingServices {
    LendingServices {
        patrons: Arc::from(create_patron_service(settings.store).await),
        catalog: Arc::from(create_catalog_service(settings.store).await),
        loans: Arc::from(create_loan_service(settings.store).await),
        holds: Arc::from(create_hold_service(settings.store).await),
        publisher: Arc::from(create_publisher(settings.publisher(), settings.store).await),
    }
}

pub(crate) fn create_circulation_service_with(settings: &Settings, registry: LicensorRegistry,
                                              services: LendingServices) -> LibraryResult<Arc<dyn CirculationService>> {
    let resolver = DeliveryResolver::new(Box::new(HttpContentFetcher::new(settings.fetch_timeout_secs)?));
    Ok(Arc::new(CirculationServiceImpl::new(settings, registry, services,
                                            Arc::new(DefaultPolicyEvaluator::default()), resolver)))
}

pub async fn create_circulation_service(settings: &Settings,
                                        registry: LicensorRegistry) -> LibraryResult<Arc<dyn CirculationService>> {
    let services = create_lending_services(settings).await;
    create_circulation_service_with(settings, registry, services)
}
