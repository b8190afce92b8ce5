use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use crate::core::domain::RequestContext;
use crate::delivery::dto::{FulfillmentContent, FulfillmentDto};
use crate::holds::dto::HoldDto;
use crate::licensor::{LicensorApi, LicensorError};
use crate::licensor::dto::{CheckoutResult, LoanInfo, RemoteActivity};
use crate::loans::dto::LoanDto;
use crate::works::dto::{DeliveryMechanismDto, LicensePoolDto, PoolAvailability};

// OpenAccessLicensor lends open-access pools: every checkout succeeds, loans
// never end, and nothing is recorded anywhere but locally.
#[derive(Debug, Clone)]
pub struct OpenAccessLicensor {
    name: String,
}

impl OpenAccessLicensor {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

#[async_trait]
impl LicensorApi for OpenAccessLicensor {
    fn name(&self) -> String {
        self.name.to_string()
    }

    fn keeps_remote_records(&self) -> bool {
        false
    }

    async fn checkout(&self, ctx: &RequestContext, pool: &LicensePoolDto,
                      mechanism: Option<&DeliveryMechanismDto>) -> Result<CheckoutResult, LicensorError> {
        if !pool.open_access {
            return Err(LicensorError::CannotLoan {
                message: format!("{} only lends open-access titles", self.name),
            });
        }
        debug!(request_id = ctx.request_id.as_str(), pool_id = pool.pool_id.as_str(), "open-access checkout");
        Ok(CheckoutResult::loan(LoanInfo {
            start: Utc::now().naive_utc(),
            end: None,
            mechanism_id: mechanism.map(|m| m.mechanism_id.to_string()),
            external_identifier: None,
        }))
    }

    async fn place_hold(&self, _ctx: &RequestContext, _pool: &LicensePoolDto) -> Result<CheckoutResult, LicensorError> {
        Err(LicensorError::CannotHold { message: "Open-access titles never need a hold.".to_string() })
    }

    async fn fulfill(&self, _ctx: &RequestContext, pool: &LicensePoolDto, _loan: &LoanDto,
                     mechanism: &DeliveryMechanismDto) -> Result<FulfillmentDto, LicensorError> {
        match &mechanism.download_url {
            Some(url) => {
                let content = if mechanism.is_streaming {
                    FulfillmentContent::Streaming { url: url.to_string() }
                } else {
                    FulfillmentContent::Link { url: url.to_string() }
                };
                Ok(FulfillmentDto::new(pool.pool_id.as_str(), mechanism.mechanism_id.as_str(),
                                       Some(mechanism.content_type.as_str()), content))
            }
            None => Err(LicensorError::CannotFulfill {
                message: format!("Could not find an open-access download for {} in {}",
                                 pool.identifier, mechanism.content_type),
            }),
        }
    }

    async fn return_loan(&self, _ctx: &RequestContext, _pool: &LicensePoolDto,
                         _loan: &LoanDto) -> Result<Option<PoolAvailability>, LicensorError> {
        Ok(None)
    }

    async fn release_hold(&self, _ctx: &RequestContext, _pool: &LicensePoolDto,
                          _hold: &HoldDto) -> Result<Option<PoolAvailability>, LicensorError> {
        Ok(None)
    }

    async fn sync_patron_activity(&self, _ctx: &RequestContext) -> Result<Vec<RemoteActivity>, LicensorError> {
        Ok(vec![])
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::core::domain::{Configuration, RequestContext};
    use crate::core::library::Audience;
    use crate::delivery::dto::FulfillmentContent;
    use crate::licensor::{LicensorApi, LicensorError};
    use crate::licensor::dto::CheckoutOutcome;
    use crate::licensor::open_access::OpenAccessLicensor;
    use crate::loans::dto::LoanDto;
    use crate::patrons::dto::PatronDto;
    use crate::works::dto::{DeliveryMechanismDto, LicensePoolDto, WorkDto};

    fn ctx() -> RequestContext {
        RequestContext::new(&Configuration::new("main"), PatronDto::new("main", "2391"), None)
    }

    fn pool(download_url: Option<&str>) -> LicensePoolDto {
        let mut pool = LicensePoolDto::new("main", "gutenberg", "Gutenberg ID", "1342", WorkDto::new("Pride and Prejudice", Audience::Adult));
        pool.open_access = true;
        let mut mechanism = DeliveryMechanismDto::new("epub", "application/epub+zip", None);
        mechanism.download_url = download_url.map(str::to_string);
        pool.delivery_mechanisms.push(mechanism);
        pool
    }

    #[tokio::test]
    async fn test_should_lend_indefinitely() {
        let licensor = OpenAccessLicensor::new("gutenberg");
        let pool = pool(Some("https://example.org/1342.epub"));
        let res = licensor.checkout(&ctx(), &pool, pool.mechanism("epub")).await.expect("should checkout");
        match res.outcome {
            CheckoutOutcome::Loan(info) => {
                assert_eq!(None, info.end);
                assert_eq!(Some("epub".to_string()), info.mechanism_id);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(!licensor.keeps_remote_records());
    }

    #[tokio::test]
    async fn test_should_refuse_licensed_pool() {
        let licensor = OpenAccessLicensor::new("gutenberg");
        let mut pool = pool(None);
        pool.open_access = false;
        assert!(matches!(licensor.checkout(&ctx(), &pool, None).await, Err(LicensorError::CannotLoan { .. })));
    }

    #[tokio::test]
    async fn test_should_fulfill_with_download_link() {
        let licensor = OpenAccessLicensor::new("gutenberg");
        let pool = pool(Some("https://example.org/1342.epub"));
        let loan = LoanDto::new("p1", &pool, Utc::now().naive_utc(), None);
        let mechanism = pool.mechanism("epub").expect("should have epub").clone();
        let fulfillment = licensor.fulfill(&ctx(), &pool, &loan, &mechanism).await.expect("should fulfill");
        assert_eq!(FulfillmentContent::Link { url: "https://example.org/1342.epub".to_string() }, fulfillment.content);
        assert_eq!(Some("application/epub+zip".to_string()), fulfillment.content_type);
    }

    #[tokio::test]
    async fn test_should_fail_without_download() {
        let licensor = OpenAccessLicensor::new("gutenberg");
        let pool = pool(None);
        let loan = LoanDto::new("p1", &pool, Utc::now().naive_utc(), None);
        let mechanism = pool.mechanism("epub").expect("should have epub").clone();
        assert!(matches!(licensor.fulfill(&ctx(), &pool, &loan, &mechanism).await, Err(LicensorError::CannotFulfill { .. })));
    }
}
