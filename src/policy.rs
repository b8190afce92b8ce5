use chrono::NaiveDateTime;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult, PolicyDenial};
use crate::patrons::Patron;
use crate::works::dto::LicensePoolDto;

pub mod evaluator;

// Decision is the outcome of applying lending policy to one patron and pool.
#[derive(Debug, PartialEq, Clone)]
pub struct Decision {
    pub allow: bool,
    pub reason: Option<PolicyDenial>,
    pub retry_after: Option<NaiveDateTime>,
}

impl Decision {
    pub fn allow() -> Self {
        Self { allow: true, reason: None, retry_after: None }
    }

    pub fn deny(denial: PolicyDenial) -> Self {
        Self { allow: false, retry_after: denial.retry_after(), reason: Some(denial) }
    }

    pub fn into_result(self) -> LibraryResult<()> {
        match self.reason {
            Some(denial) if !self.allow => Err(LibraryError::policy_denied(denial)),
            _ => Ok(()),
        }
    }
}

// PolicyEvaluator decides whether a patron may borrow from (or queue for) a
// pool. Implementations must not perform I/O.
pub trait PolicyEvaluator: Sync + Send {
    fn evaluate(&self, patron: &dyn Patron, pool: &LicensePoolDto,
                config: &Configuration, now: NaiveDateTime) -> Decision;
}
