use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use chrono::{Duration, Utc};
use tracing::{error, info, warn};
use crate::circulation::dto::{BorrowOutcome, RevokeOutcome, SyncReport};
use crate::core::domain::{LicensorProtocol, RequestContext};
use crate::core::events::DomainEvent;
use crate::core::library::{HoldStatus, LibraryError, LibraryResult, PolicyDenial};
use crate::delivery::dto::FulfillmentDto;
use crate::gateway::events::EventPublisher;
use crate::holds::domain::HoldService;
use crate::holds::dto::HoldDto;
use crate::licensor::{LicensorApi, LicensorError};
use crate::licensor::dto::{CheckoutOutcome, CheckoutResult, HoldInfo, LoanInfo, RemoteActivity};
use crate::loans::domain::LoanService;
use crate::loans::dto::LoanDto;
use crate::policy::PolicyEvaluator;
use crate::works::domain::CatalogService;
use crate::works::dto::{DeliveryMechanismDto, LicensePoolDto, PoolAvailability};

// LendingStateMachine moves a (patron, pool) pair between no record, a hold
// and a loan. Local records change only after the licensor confirmed the
// transition; they mirror the licensor and are never a substitute for asking it.
pub struct LendingStateMachine {
    evaluator: Arc<dyn PolicyEvaluator>,
    catalog: Arc<dyn CatalogService>,
    loans: Arc<dyn LoanService>,
    holds: Arc<dyn HoldService>,
    publisher: Arc<dyn EventPublisher>,
}

impl LendingStateMachine {
    pub fn new(evaluator: Arc<dyn PolicyEvaluator>, catalog: Arc<dyn CatalogService>,
               loans: Arc<dyn LoanService>, holds: Arc<dyn HoldService>,
               publisher: Arc<dyn EventPublisher>) -> Self {
        Self { evaluator, catalog, loans, holds, publisher }
    }

    pub async fn borrow(&self, ctx: &RequestContext, licensor: &dyn LicensorApi, pool: &LicensePoolDto,
                        mechanism: Option<&DeliveryMechanismDto>) -> LibraryResult<BorrowOutcome> {
        // time has passed since selection, so policy is applied again
        self.evaluator.evaluate(&ctx.patron, pool, &ctx.library, Utc::now().naive_utc()).into_result()?;
        let patron_id = ctx.patron.patron_id.as_str();
        if let Some(loan) = self.loans.find_loan(patron_id, pool.pool_id.as_str()).await? {
            return Ok(BorrowOutcome::Loan { loan, is_new: false });
        }
        let existing_hold = self.holds.find_hold(patron_id, pool.pool_id.as_str()).await?;
        self.check_limits(ctx, pool, existing_hold.as_ref()).await?;

        let try_checkout = pool.has_copies() || existing_hold.as_ref().map(|h| h.is_reserved()).unwrap_or(false);
        if try_checkout {
            match licensor.checkout(ctx, pool, mechanism).await {
                Ok(res) => return self.record_checkout(ctx, pool, existing_hold, res).await,
                Err(LicensorError::NoAvailableCopies) => {
                    info!(pool_id = pool.pool_id.as_str(), patron_id = patron_id,
                        "licensor has no copies, placing hold instead");
                }
                Err(LicensorError::AlreadyCheckedOut) => {
                    return self.mirror_existing_loan(ctx, pool, existing_hold).await;
                }
                Err(err) => return Err(LibraryError::from(err)),
            }
        }

        if let Some(hold) = existing_hold {
            return Ok(BorrowOutcome::Hold { hold, is_new: false });
        }
        if !ctx.library.allow_holds {
            return Err(LibraryError::policy_denied(PolicyDenial::HoldsDisabled));
        }
        match licensor.place_hold(ctx, pool).await {
            Ok(res) => self.record_checkout(ctx, pool, None, res).await,
            Err(LicensorError::AlreadyOnHold) => {
                let info = HoldInfo { start: Utc::now().naive_utc(), end: None, position: None, reserved: false };
                let hold = self.record_hold(ctx, pool, None, &info).await?;
                Ok(BorrowOutcome::Hold { hold, is_new: false })
            }
            Err(err) => Err(LibraryError::from(err)),
        }
    }

    pub async fn fulfill(&self, ctx: &RequestContext, licensor: &dyn LicensorApi, pool: &LicensePoolDto,
                         mechanism_id: Option<&str>) -> LibraryResult<FulfillmentDto> {
        let loan = self.loans.find_loan(ctx.patron.patron_id.as_str(), pool.pool_id.as_str()).await?
            .ok_or_else(|| LibraryError::no_active_loan("You have no active loan for this title."))?;
        let mechanism_id = match (mechanism_id, loan.mechanism_id.as_deref()) {
            (Some(requested), Some(bound)) if requested != bound => {
                return Err(LibraryError::mechanism_conflict(
                    format!("This loan is already locked to delivery mechanism {}; it cannot be fulfilled as {}.",
                            bound, requested).as_str()));
            }
            (Some(requested), _) => requested.to_string(),
            (None, Some(bound)) => bound.to_string(),
            (None, None) => {
                return Err(LibraryError::mechanism_required("You must specify a delivery mechanism to fulfill this loan."));
            }
        };
        let mechanism = pool.mechanism(mechanism_id.as_str()).ok_or_else(|| LibraryError::bad_delivery_mechanism(
            format!("Cannot fulfill this title through delivery mechanism {}", mechanism_id).as_str()))?;

        let fulfillment = licensor.fulfill(ctx, pool, &loan, mechanism).await.map_err(LibraryError::from)?
            .streaming(mechanism.is_streaming);
        info!(pool_id = pool.pool_id.as_str(), patron_id = loan.patron_id.as_str(),
            licensor = licensor.name().as_str(), mechanism_id = mechanism_id.as_str(), "loan fulfilled");

        let loan = if loan.mechanism_id.is_none() {
            let mut bound = loan.clone();
            bound.mechanism_id = Some(mechanism_id.to_string());
            match self.loans.update_loan(&bound).await {
                Ok(updated) => updated,
                Err(err) => {
                    // the licensor enforces the binding too, so delivery goes ahead
                    error!(loan_id = loan.loan_id.as_str(), error = %err, "failed to bind delivery mechanism");
                    loan
                }
            }
        } else {
            loan
        };
        self.publish(DomainEvent::updated("loan_fulfilled", "loans", loan.loan_id.as_str(),
                                          &metadata(ctx, licensor), &loan)).await;
        Ok(fulfillment)
    }

    pub async fn revoke(&self, ctx: &RequestContext, licensor: &dyn LicensorApi,
                        pool: &LicensePoolDto) -> LibraryResult<RevokeOutcome> {
        let patron_id = ctx.patron.patron_id.as_str();
        if let Some(loan) = self.loans.find_loan(patron_id, pool.pool_id.as_str()).await? {
            match licensor.return_loan(ctx, pool, &loan).await {
                Ok(availability) => self.apply_availability(pool, availability).await,
                // nothing to return remotely; the local record is simply stale
                Err(LicensorError::NotCheckedOut) => {
                    warn!(loan_id = loan.loan_id.as_str(), "licensor had no record of returned loan");
                }
                Err(err) => return Err(LibraryError::from(err)),
            }
            mirror(self.loans.remove_loan(loan.loan_id.as_str()).await, "remove returned loan")?;
            info!(pool_id = pool.pool_id.as_str(), patron_id = patron_id,
                licensor = licensor.name().as_str(), "loan returned");
            self.publish(DomainEvent::deleted("loan_returned", "loans", loan.loan_id.as_str(),
                                              &metadata(ctx, licensor), &loan)).await;
            return Ok(RevokeOutcome::LoanReturned { loan });
        }

        let hold = self.holds.find_hold(patron_id, pool.pool_id.as_str()).await?
            .ok_or_else(|| LibraryError::no_active_loan_or_hold(
                "You have no active loan or hold for this title."))?;
        if hold.is_reserved() {
            return Err(LibraryError::cannot_release_hold(
                "This hold has a copy reserved for you and can no longer be released.", true));
        }
        match licensor.release_hold(ctx, pool, &hold).await {
            Ok(availability) => self.apply_availability(pool, availability).await,
            Err(LicensorError::NotOnHold) => {
                warn!(hold_id = hold.hold_id.as_str(), "licensor had no record of released hold");
            }
            Err(err) => return Err(LibraryError::from(err)),
        }
        mirror(self.holds.remove_hold(hold.hold_id.as_str()).await, "remove released hold")?;
        info!(pool_id = pool.pool_id.as_str(), patron_id = patron_id,
            licensor = licensor.name().as_str(), "hold released");
        self.publish(DomainEvent::deleted("hold_released", "holds", hold.hold_id.as_str(),
                                          &metadata(ctx, licensor), &hold)).await;
        Ok(RevokeOutcome::HoldReleased { hold })
    }

    // Brings the patron's local records for one licensor in line with what the
    // licensor reports. Records younger than the grace period are kept even if
    // the licensor does not list them yet.
    pub async fn sync(&self, ctx: &RequestContext, licensor: &dyn LicensorApi) -> LibraryResult<SyncReport> {
        let mut report = SyncReport::default();
        if !licensor.keeps_remote_records() {
            return Ok(report);
        }
        let remote = licensor.sync_patron_activity(ctx).await.map_err(LibraryError::from)?;
        let name = licensor.name();
        let patron_id = ctx.patron.patron_id.as_str();
        let mut local_loans: HashMap<String, LoanDto> = self.loans.find_loans_by_patron(patron_id).await?
            .into_iter().filter(|l| l.licensor == name).map(|l| (l.pool_id.to_string(), l)).collect();
        let mut local_holds: HashMap<String, HoldDto> = self.holds.find_holds_by_patron(patron_id).await?
            .into_iter().filter(|h| h.licensor == name).map(|h| (h.pool_id.to_string(), h)).collect();
        let mut seen_loans = HashSet::new();
        let mut seen_holds = HashSet::new();

        for activity in &remote {
            let (identifier_type, identifier) = activity.identifier();
            let pools = self.catalog.find_pools(ctx.library.library_id.as_str(), identifier_type, identifier).await?;
            let pool = match pools.into_iter().find(|p| p.licensor == name) {
                Some(pool) => pool,
                None => {
                    warn!(licensor = name.as_str(), identifier = identifier, "licensor reports a title the library has no pool for");
                    continue;
                }
            };
            match activity {
                RemoteActivity::Loan { info, .. } => {
                    seen_loans.insert(pool.pool_id.to_string());
                    match local_loans.remove(pool.pool_id.as_str()) {
                        Some(loan) if loan.end != info.end => {
                            let mut loan = loan;
                            loan.end = info.end;
                            self.loans.update_loan(&loan).await?;
                            report.loans_updated += 1;
                        }
                        Some(_) => {}
                        None => {
                            self.create_loan(pool_loan(ctx, &pool, info)).await?;
                            report.loans_added += 1;
                        }
                    }
                    // a remote loan supersedes any hold on the same pool
                    if let Some(hold) = local_holds.remove(pool.pool_id.as_str()) {
                        self.holds.remove_hold(hold.hold_id.as_str()).await?;
                        report.holds_removed += 1;
                    }
                }
                RemoteActivity::Hold { info, .. } => {
                    if seen_loans.contains(pool.pool_id.as_str()) {
                        continue;
                    }
                    seen_holds.insert(pool.pool_id.to_string());
                    match local_holds.remove(pool.pool_id.as_str()) {
                        Some(hold) => {
                            if hold.position != info.position || hold.is_reserved() != info.reserved {
                                self.record_hold(ctx, &pool, Some(hold), info).await?;
                                report.holds_updated += 1;
                            }
                        }
                        None => {
                            self.record_hold(ctx, &pool, None, info).await?;
                            report.holds_added += 1;
                        }
                    }
                }
            }
        }

        let cutoff = Utc::now().naive_utc() - Duration::seconds(ctx.library.sync_grace_seconds);
        for (pool_id, loan) in local_loans {
            if seen_loans.contains(pool_id.as_str()) || loan.created_at > cutoff {
                continue;
            }
            self.loans.remove_loan(loan.loan_id.as_str()).await?;
            report.loans_removed += 1;
            self.publish(DomainEvent::deleted("loan_synced", "loans", loan.loan_id.as_str(),
                                              &metadata(ctx, licensor), &loan)).await;
        }
        for (pool_id, hold) in local_holds {
            if seen_holds.contains(pool_id.as_str()) || hold.created_at > cutoff {
                continue;
            }
            self.holds.remove_hold(hold.hold_id.as_str()).await?;
            report.holds_removed += 1;
            self.publish(DomainEvent::deleted("hold_synced", "holds", hold.hold_id.as_str(),
                                              &metadata(ctx, licensor), &hold)).await;
        }
        info!(patron_id = patron_id, licensor = name.as_str(), report = ?report, "patron activity synced");
        Ok(report)
    }

    // Limits are checked against local records, which may lag the licensor;
    // the licensor still has the final word.
    async fn check_limits(&self, ctx: &RequestContext, pool: &LicensePoolDto,
                          existing_hold: Option<&HoldDto>) -> LibraryResult<()> {
        let patron_id = ctx.patron.patron_id.as_str();
        if pool.has_copies() {
            if let Some(limit) = ctx.library.max_loans.filter(|_| !pool.open_access) {
                let open_access_licensors: HashSet<&str> = ctx.library.collections.iter()
                    .filter(|c| c.protocol == LicensorProtocol::OpenAccess)
                    .map(|c| c.licensor.as_str())
                    .collect();
                let count = self.loans.find_loans_by_patron(patron_id).await?.iter()
                    .filter(|l| !open_access_licensors.contains(l.licensor.as_str()))
                    .count();
                if count >= limit {
                    return Err(LibraryError::from(LicensorError::PatronLoanLimitReached { limit }));
                }
            }
        } else if existing_hold.is_none() {
            if let Some(limit) = ctx.library.max_holds {
                if self.holds.find_holds_by_patron(patron_id).await?.len() >= limit {
                    return Err(LibraryError::from(LicensorError::PatronHoldLimitReached { limit }));
                }
            }
        }
        Ok(())
    }

    async fn record_checkout(&self, ctx: &RequestContext, pool: &LicensePoolDto,
                             existing_hold: Option<HoldDto>, res: CheckoutResult) -> LibraryResult<BorrowOutcome> {
        self.apply_availability(pool, res.availability).await;
        match res.outcome {
            CheckoutOutcome::Loan(info) => {
                let loan = pool_loan(ctx, pool, &info);
                mirror(self.create_loan(loan.clone()).await, "record new loan")?;
                if let Some(hold) = existing_hold {
                    mirror(self.holds.remove_hold(hold.hold_id.as_str()).await, "remove promoted hold")?;
                }
                info!(pool_id = pool.pool_id.as_str(), patron_id = loan.patron_id.as_str(),
                    licensor = pool.licensor.as_str(), "loan created");
                self.publish(DomainEvent::added("loan_created", "loans", loan.loan_id.as_str(),
                                                &pool_metadata(ctx, pool), &loan)).await;
                Ok(BorrowOutcome::Loan { loan, is_new: true })
            }
            CheckoutOutcome::Hold(info) => {
                let is_new = existing_hold.is_none();
                let hold = mirror(self.record_hold(ctx, pool, existing_hold, &info).await, "record hold")?;
                Ok(BorrowOutcome::Hold { hold, is_new })
            }
        }
    }

    async fn mirror_existing_loan(&self, ctx: &RequestContext, pool: &LicensePoolDto,
                                  existing_hold: Option<HoldDto>) -> LibraryResult<BorrowOutcome> {
        let info = LoanInfo { start: Utc::now().naive_utc(), end: None, mechanism_id: None, external_identifier: None };
        let loan = pool_loan(ctx, pool, &info);
        mirror(self.create_loan(loan.clone()).await, "record existing remote loan")?;
        if let Some(hold) = existing_hold {
            mirror(self.holds.remove_hold(hold.hold_id.as_str()).await, "remove promoted hold")?;
        }
        info!(pool_id = pool.pool_id.as_str(), patron_id = loan.patron_id.as_str(),
            "licensor already had this loan, mirrored it locally");
        Ok(BorrowOutcome::Loan { loan, is_new: false })
    }

    async fn create_loan(&self, loan: LoanDto) -> LibraryResult<LoanDto> {
        self.loans.add_loan(&loan).await?;
        Ok(loan)
    }

    async fn record_hold(&self, ctx: &RequestContext, pool: &LicensePoolDto,
                         existing: Option<HoldDto>, info: &HoldInfo) -> LibraryResult<HoldDto> {
        let status = if info.reserved { HoldStatus::Reserved } else { HoldStatus::Queued };
        match existing {
            Some(mut hold) => {
                hold.position = info.position;
                hold.hold_status = status;
                hold.end = info.end;
                let hold = self.holds.update_hold(&hold).await?;
                self.publish(DomainEvent::updated("hold_updated", "holds", hold.hold_id.as_str(),
                                                  &pool_metadata(ctx, pool), &hold)).await;
                Ok(hold)
            }
            None => {
                let mut hold = HoldDto::new(ctx.patron.patron_id.as_str(), pool, info.start, info.position);
                hold.hold_status = status;
                hold.end = info.end;
                self.holds.add_hold(&hold).await?;
                info!(pool_id = pool.pool_id.as_str(), patron_id = hold.patron_id.as_str(),
                    licensor = pool.licensor.as_str(), position = ?hold.position, "hold placed");
                self.publish(DomainEvent::added("hold_placed", "holds", hold.hold_id.as_str(),
                                                &pool_metadata(ctx, pool), &hold)).await;
                Ok(hold)
            }
        }
    }

    // counters are hints, so failing to store them never fails the transition
    async fn apply_availability(&self, pool: &LicensePoolDto, availability: Option<PoolAvailability>) {
        if let Some(availability) = availability {
            if let Err(err) = self.catalog.apply_availability(pool.pool_id.as_str(), &availability).await {
                warn!(pool_id = pool.pool_id.as_str(), error = %err, "failed to record pool availability");
            }
        }
    }

    async fn publish(&self, event: serde_json::Result<DomainEvent>) {
        let res = match event {
            Ok(event) => self.publisher.publish(&event).await,
            Err(err) => Err(LibraryError::from(err)),
        };
        if let Err(err) = res {
            warn!(error = %err, "failed to publish circulation event");
        }
    }
}

fn pool_loan(ctx: &RequestContext, pool: &LicensePoolDto, info: &LoanInfo) -> LoanDto {
    let mut loan = LoanDto::new(ctx.patron.patron_id.as_str(), pool, info.start, info.end);
    loan.mechanism_id = info.mechanism_id.clone();
    loan.external_identifier = info.external_identifier.clone();
    loan
}

// a storage failure after the licensor confirmed means the two sides now disagree
fn mirror<T>(res: LibraryResult<T>, action: &str) -> LibraryResult<T> {
    res.map_err(|err| {
        if err.is_storage() {
            error!(action = action, error = %err, "licensor confirmed but local state was not updated");
            LibraryError::mirror_failed(format!("failed to {}: {}", action, err).as_str(), Some(action.to_string()))
        } else {
            err
        }
    })
}

fn metadata(ctx: &RequestContext, licensor: &dyn LicensorApi) -> HashMap<String, String> {
    HashMap::from([
        ("library_id".to_string(), ctx.library.library_id.to_string()),
        ("patron_id".to_string(), ctx.patron.patron_id.to_string()),
        ("licensor".to_string(), licensor.name()),
        ("request_id".to_string(), ctx.request_id.to_string()),
    ])
}

fn pool_metadata(ctx: &RequestContext, pool: &LicensePoolDto) -> HashMap<String, String> {
    HashMap::from([
        ("library_id".to_string(), ctx.library.library_id.to_string()),
        ("patron_id".to_string(), ctx.patron.patron_id.to_string()),
        ("licensor".to_string(), pool.licensor.to_string()),
        ("request_id".to_string(), ctx.request_id.to_string()),
    ])
}
