use std::collections::VecDeque;
use std::sync::Mutex;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use crate::core::domain::RequestContext;
use crate::delivery::dto::{FulfillmentContent, FulfillmentDto};
use crate::holds::dto::HoldDto;
use crate::licensor::{LicensorApi, LicensorError};
use crate::licensor::dto::{CheckoutResult, HoldInfo, LoanInfo, RemoteActivity};
use crate::loans::dto::LoanDto;
use crate::works::dto::{DeliveryMechanismDto, LicensePoolDto, PoolAvailability};

#[derive(Default)]
struct Script {
    checkout: VecDeque<Result<CheckoutResult, LicensorError>>,
    hold: VecDeque<Result<CheckoutResult, LicensorError>>,
    fulfill: VecDeque<Result<FulfillmentDto, LicensorError>>,
    return_loan: VecDeque<Result<Option<PoolAvailability>, LicensorError>>,
    release: VecDeque<Result<Option<PoolAvailability>, LicensorError>>,
    sync: VecDeque<Result<Vec<RemoteActivity>, LicensorError>>,
    calls: Vec<String>,
}

// FakeLicensor replays queued answers and records every call it receives.
// With nothing queued it behaves like a licensor with copies to spare.
pub(crate) struct FakeLicensor {
    name: String,
    script: Mutex<Script>,
}

impl FakeLicensor {
    pub(crate) fn new(name: &str) -> Self {
        Self { name: name.to_string(), script: Mutex::new(Script::default()) }
    }

    pub(crate) fn queue_checkout(&self, res: Result<CheckoutResult, LicensorError>) {
        self.script.lock().expect("script lock").checkout.push_back(res);
    }

    pub(crate) fn queue_hold(&self, res: Result<CheckoutResult, LicensorError>) {
        self.script.lock().expect("script lock").hold.push_back(res);
    }

    pub(crate) fn queue_fulfill(&self, res: Result<FulfillmentDto, LicensorError>) {
        self.script.lock().expect("script lock").fulfill.push_back(res);
    }

    pub(crate) fn queue_return(&self, res: Result<Option<PoolAvailability>, LicensorError>) {
        self.script.lock().expect("script lock").return_loan.push_back(res);
    }

    pub(crate) fn queue_release(&self, res: Result<Option<PoolAvailability>, LicensorError>) {
        self.script.lock().expect("script lock").release.push_back(res);
    }

    pub(crate) fn queue_sync(&self, res: Result<Vec<RemoteActivity>, LicensorError>) {
        self.script.lock().expect("script lock").sync.push_back(res);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.script.lock().expect("script lock").calls.clone()
    }

    fn record(&self, call: String) -> std::sync::MutexGuard<'_, Script> {
        let mut script = self.script.lock().expect("script lock");
        script.calls.push(call);
        script
    }
}

pub(crate) fn loan_info(days: i64) -> LoanInfo {
    LoanInfo {
        start: Utc::now().naive_utc(),
        end: Some(Utc::now().naive_utc() + Duration::days(days)),
        mechanism_id: None,
        external_identifier: None,
    }
}

pub(crate) fn hold_info(position: Option<i64>, reserved: bool) -> HoldInfo {
    HoldInfo {
        start: Utc::now().naive_utc(),
        end: None,
        position,
        reserved,
    }
}

#[async_trait]
impl LicensorApi for FakeLicensor {
    fn name(&self) -> String {
        self.name.to_string()
    }

    async fn checkout(&self, _ctx: &RequestContext, pool: &LicensePoolDto,
                      _mechanism: Option<&DeliveryMechanismDto>) -> Result<CheckoutResult, LicensorError> {
        let mut script = self.record(format!("checkout:{}", pool.pool_id));
        script.checkout.pop_front().unwrap_or_else(|| Ok(CheckoutResult::loan(loan_info(14))))
    }

    async fn place_hold(&self, _ctx: &RequestContext, pool: &LicensePoolDto) -> Result<CheckoutResult, LicensorError> {
        let mut script = self.record(format!("place_hold:{}", pool.pool_id));
        script.hold.pop_front().unwrap_or_else(|| Ok(CheckoutResult::hold(hold_info(Some(1), false))))
    }

    async fn fulfill(&self, _ctx: &RequestContext, pool: &LicensePoolDto, _loan: &LoanDto,
                     mechanism: &DeliveryMechanismDto) -> Result<FulfillmentDto, LicensorError> {
        let mut script = self.record(format!("fulfill:{}:{}", pool.pool_id, mechanism.mechanism_id));
        script.fulfill.pop_front().unwrap_or_else(|| Ok(FulfillmentDto::new(
            pool.pool_id.as_str(), mechanism.mechanism_id.as_str(), Some(mechanism.content_type.as_str()),
            FulfillmentContent::Link { url: format!("https://licensor.example/{}/{}", pool.pool_id, mechanism.mechanism_id) }),
        ))
    }

    async fn return_loan(&self, _ctx: &RequestContext, pool: &LicensePoolDto,
                         _loan: &LoanDto) -> Result<Option<PoolAvailability>, LicensorError> {
        let mut script = self.record(format!("return_loan:{}", pool.pool_id));
        script.return_loan.pop_front().unwrap_or(Ok(None))
    }

    async fn release_hold(&self, _ctx: &RequestContext, pool: &LicensePoolDto,
                          _hold: &HoldDto) -> Result<Option<PoolAvailability>, LicensorError> {
        let mut script = self.record(format!("release_hold:{}", pool.pool_id));
        script.release.pop_front().unwrap_or(Ok(None))
    }

    async fn sync_patron_activity(&self, ctx: &RequestContext) -> Result<Vec<RemoteActivity>, LicensorError> {
        let mut script = self.record(format!("sync:{}", ctx.patron.patron_id));
        script.sync.pop_front().unwrap_or_else(|| Ok(vec![]))
    }
}
