use std::sync::Arc;
use crate::circulation::domain::CirculationService;
use crate::circulation::domain::service::LendingServices;
use crate::circulation::factory::{create_circulation_service_with, create_lending_services};
use crate::core::domain::Settings;
use crate::core::library::Audience;
use crate::licensor::registry::LicensorRegistry;
use crate::patrons::dto::PatronDto;
use crate::works::dto::{DeliveryMechanismDto, LicensePoolDto, WorkDto};

pub(crate) const CREDENTIAL: &str = "23333012345678";

pub(crate) struct CommandFixture {
    pub(crate) service: Arc<dyn CirculationService>,
    pub(crate) services: LendingServices,
    pub(crate) pool: LicensePoolDto,
}

// an in-memory dev library with one patron and one open-access title
pub(crate) async fn command_fixture(download_url: &str) -> CommandFixture {
    let settings = Settings::dev();
    let services = create_lending_services(&settings).await;
    services.patrons.add_patron(&PatronDto::new("dev", CREDENTIAL)).await.expect("should add patron");
    let mut pool = LicensePoolDto::new("dev", "open-access", "Gutenberg ID", "84",
                                       WorkDto::new("Frankenstein", Audience::Adult));
    pool.open_access = true;
    let mut mechanism = DeliveryMechanismDto::new("epub", "application/epub+zip", None);
    mechanism.download_url = Some(download_url.to_string());
    pool.delivery_mechanisms.push(mechanism);
    services.catalog.add_pool(&pool).await.expect("should add pool");
    let service = create_circulation_service_with(&settings, LicensorRegistry::from_settings(&settings), services.clone())
        .expect("should build service");
    CommandFixture { service, services, pool }
}
