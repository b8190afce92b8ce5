use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};
use crate::circulation::domain::CirculationService;
use crate::circulation::domain::lending::LendingStateMachine;
use crate::circulation::domain::selector::{ResourceSelector, SelectionOutcome};
use crate::circulation::dto::{ActivityDto, Bookshelf, BorrowOutcome, RevokeOutcome};
use crate::core::domain::{Configuration, RequestContext, Settings};
use crate::core::library::{LibraryError, LibraryResult};
use crate::delivery::dto::DeliveredContent;
use crate::delivery::resolver::DeliveryResolver;
use crate::gateway::events::EventPublisher;
use crate::holds::domain::HoldService;
use crate::licensor::registry::LicensorRegistry;
use crate::loans::domain::LoanService;
use crate::patrons::domain::PatronService;
use crate::patrons::Patron;
use crate::policy::PolicyEvaluator;
use crate::works::domain::CatalogService;
use crate::works::dto::LicensePoolDto;

// LendingServices bundles the record keepers shared by the facade and the
// lending state machine.
#[derive(Clone)]
pub(crate) struct LendingServices {
    pub(crate) patrons: Arc<dyn PatronService>,
    pub(crate) catalog: Arc<dyn CatalogService>,
    pub(crate) loans: Arc<dyn LoanService>,
    pub(crate) holds: Arc<dyn HoldService>,
    pub(crate) publisher: Arc<dyn EventPublisher>,
}

pub(crate) struct CirculationServiceImpl {
    libraries: HashMap<String, Configuration>,
    registry: LicensorRegistry,
    services: LendingServices,
    selector: ResourceSelector,
    machine: LendingStateMachine,
    resolver: DeliveryResolver,
}

impl CirculationServiceImpl {
    pub(crate) fn new(settings: &Settings, registry: LicensorRegistry, services: LendingServices,
                      evaluator: Arc<dyn PolicyEvaluator>, resolver: DeliveryResolver) -> Self {
        let machine = LendingStateMachine::new(evaluator.clone(), services.catalog.clone(),
                                               services.loans.clone(), services.holds.clone(),
                                               services.publisher.clone());
        Self {
            libraries: settings.libraries.iter().map(|l| (l.library_id.to_string(), l.clone())).collect(),
            registry,
            services,
            selector: ResourceSelector::new(evaluator),
            machine,
            resolver,
        }
    }

    // a pool id in a URL may belong to another library; treat it as absent
    async fn find_owned_pool(&self, ctx: &RequestContext, pool_id: &str) -> LibraryResult<LicensePoolDto> {
        let pool = self.services.catalog.find_pool(pool_id).await?;
        if pool.library_id != ctx.library.library_id {
            return Err(LibraryError::not_found(
                format!("pool {} not found in library {}", pool_id, ctx.library.library_id).as_str()));
        }
        Ok(pool)
    }
}

#[async_trait]
impl CirculationService for CirculationServiceImpl {
    async fn request_context(&self, library_id: &str, credential: Option<&str>) -> LibraryResult<RequestContext> {
        let library = self.libraries.get(library_id)
            .ok_or_else(|| LibraryError::not_found(format!("library {} not found", library_id).as_str()))?;
        let credential = credential
            .ok_or_else(|| LibraryError::invalid_credentials("Patron credentials are required."))?;
        let patron = self.services.patrons.authenticate(library_id, credential).await?;
        Ok(RequestContext::new(library, patron, Some(credential.to_string())))
    }

    async fn borrow(&self, ctx: &RequestContext, identifier_type: &str, identifier: &str,
                    mechanism_id: Option<&str>) -> LibraryResult<BorrowOutcome> {
        let pools = self.services.catalog.find_pools(ctx.library.library_id.as_str(), identifier_type, identifier).await?;
        if pools.is_empty() {
            return Err(LibraryError::no_licenses("The library has no licenses for this title."));
        }
        let loans = self.services.loans.find_loans_by_patron(ctx.patron.patron_id.as_str()).await?;
        match self.selector.select(&pools, &ctx.patron, &loans, mechanism_id, &ctx.library, Utc::now().naive_utc()) {
            SelectionOutcome::Selected { pool, mechanism } => {
                let licensor = self.registry.get(ctx.library.library_id.as_str(), pool.licensor.as_str())?;
                info!(request_id = ctx.request_id.as_str(), pool_id = pool.pool_id.as_str(),
                    licensor = pool.licensor.as_str(), "borrowing from selected pool");
                self.machine.borrow(ctx, licensor.as_ref(), &pool, mechanism.as_ref()).await
            }
            SelectionOutcome::NoneFound => {
                Err(LibraryError::no_licenses("The library has no licenses for this title."))
            }
            SelectionOutcome::Denied(err) => Err(err),
        }
    }

    async fn fulfill(&self, ctx: &RequestContext, pool_id: &str,
                     mechanism_id: Option<&str>) -> LibraryResult<DeliveredContent> {
        let pool = self.find_owned_pool(ctx, pool_id).await?;
        let licensor = self.registry.get(ctx.library.library_id.as_str(), pool.licensor.as_str())?;
        let fulfillment = self.machine.fulfill(ctx, licensor.as_ref(), &pool, mechanism_id).await?;
        self.resolver.resolve(&fulfillment).await
    }

    async fn revoke(&self, ctx: &RequestContext, pool_id: &str) -> LibraryResult<RevokeOutcome> {
        let pool = self.find_owned_pool(ctx, pool_id).await?;
        let licensor = self.registry.get(ctx.library.library_id.as_str(), pool.licensor.as_str())?;
        self.machine.revoke(ctx, licensor.as_ref(), &pool).await
    }

    async fn sync(&self, ctx: &RequestContext, force: bool) -> LibraryResult<Bookshelf> {
        let now = Utc::now().naive_utc();
        let patron_id = ctx.patron.patron_id.as_str();
        let mut synced = false;
        if force || ctx.patron.needs_external_sync(now) {
            synced = true;
            for licensor in self.registry.for_library(ctx.library.library_id.as_str()) {
                if let Err(err) = self.machine.sync(ctx, licensor.as_ref()).await {
                    synced = false;
                    error!(patron_id = patron_id, licensor = licensor.name().as_str(), error = %err,
                        "failed to sync patron activity, serving local records");
                }
            }
            if let Err(err) = self.services.patrons.record_external_sync(&ctx.patron, now).await {
                warn!(patron_id = patron_id, error = %err, "failed to record sync time");
            }
        }
        let loans = self.services.loans.find_loans_by_patron(patron_id).await?;
        let holds = self.services.holds.find_holds_by_patron(patron_id).await?;
        Ok(Bookshelf { loans, holds, synced })
    }

    async fn detail(&self, ctx: &RequestContext, identifier_type: &str, identifier: &str) -> LibraryResult<ActivityDto> {
        let pools = self.services.catalog.find_pools(ctx.library.library_id.as_str(), identifier_type, identifier).await?;
        let patron_id = ctx.patron.patron_id.as_str();
        for pool in &pools {
            if let Some(loan) = self.services.loans.find_loan(patron_id, pool.pool_id.as_str()).await? {
                return Ok(ActivityDto::Loan { loan });
            }
        }
        for pool in &pools {
            if let Some(hold) = self.services.holds.find_hold(patron_id, pool.pool_id.as_str()).await? {
                return Ok(ActivityDto::Hold { hold });
            }
        }
        Err(LibraryError::no_active_loan_or_hold("You have no active loan or hold for this title."))
    }
}
