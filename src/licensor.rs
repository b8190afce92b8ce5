use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use crate::core::domain::RequestContext;
use crate::core::library::LibraryError;
use crate::delivery::dto::FulfillmentDto;
use crate::holds::dto::HoldDto;
use crate::licensor::dto::{CheckoutResult, RemoteActivity};
use crate::loans::dto::LoanDto;
use crate::works::dto::{DeliveryMechanismDto, LicensePoolDto, PoolAvailability};

pub mod dto;
pub mod open_access;
pub mod registry;
#[cfg(test)]
pub(crate) mod testing;

// LicensorError is what a licensor adapter may raise. It is converted into
// LibraryError in exactly one place, so vendor failures never leak past the
// lending state machine.
#[derive(Debug, PartialEq, Clone)]
pub enum LicensorError {
    NoAvailableCopies,
    AlreadyCheckedOut,
    AlreadyOnHold,
    NotCheckedOut,
    NotOnHold,
    CannotLoan { message: String },
    CannotHold { message: String },
    CannotRenew { message: String },
    CannotFulfill { message: String },
    FormatNotAvailable { message: String },
    DeliveryMechanismConflict { message: String },
    NotFoundOnRemote { message: String },
    CannotReturn { message: String },
    CannotReleaseHold { message: String },
    PatronLoanLimitReached { limit: usize },
    PatronHoldLimitReached { limit: usize },
    PatronAuthorizationFailed { message: String },
    Integration { service: String, message: String },
}

impl LicensorError {
    pub fn integration(service: &str, message: &str) -> LicensorError {
        LicensorError::Integration { service: service.to_string(), message: message.to_string() }
    }
}

impl Display for LicensorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LicensorError::NoAvailableCopies => write!(f, "no copies available"),
            LicensorError::AlreadyCheckedOut => write!(f, "already checked out"),
            LicensorError::AlreadyOnHold => write!(f, "already on hold"),
            LicensorError::NotCheckedOut => write!(f, "not checked out"),
            LicensorError::NotOnHold => write!(f, "not on hold"),
            LicensorError::CannotLoan { message } => write!(f, "cannot loan: {}", message),
            LicensorError::CannotHold { message } => write!(f, "cannot hold: {}", message),
            LicensorError::CannotRenew { message } => write!(f, "cannot renew: {}", message),
            LicensorError::CannotFulfill { message } => write!(f, "cannot fulfill: {}", message),
            LicensorError::FormatNotAvailable { message } => write!(f, "format not available: {}", message),
            LicensorError::DeliveryMechanismConflict { message } => write!(f, "mechanism conflict: {}", message),
            LicensorError::NotFoundOnRemote { message } => write!(f, "not found on remote: {}", message),
            LicensorError::CannotReturn { message } => write!(f, "cannot return: {}", message),
            LicensorError::CannotReleaseHold { message } => write!(f, "cannot release hold: {}", message),
            LicensorError::PatronLoanLimitReached { limit } => write!(f, "loan limit {} reached", limit),
            LicensorError::PatronHoldLimitReached { limit } => write!(f, "hold limit {} reached", limit),
            LicensorError::PatronAuthorizationFailed { message } => write!(f, "authorization failed: {}", message),
            LicensorError::Integration { service, message } => write!(f, "{} integration failed: {}", service, message),
        }
    }
}

impl From<LicensorError> for LibraryError {
    fn from(err: LicensorError) -> Self {
        match err {
            LicensorError::NoAvailableCopies => {
                LibraryError::cannot_loan("No copies available to check out.", Some("no_available_copies".to_string()))
            }
            LicensorError::AlreadyCheckedOut => {
                LibraryError::already_checked_out("You already have an active loan for this title.")
            }
            LicensorError::AlreadyOnHold => {
                LibraryError::cannot_hold("You already have this title on hold.", Some("already_on_hold".to_string()))
            }
            LicensorError::NotCheckedOut => {
                LibraryError::no_active_loan("You have no active loan for this title.")
            }
            LicensorError::NotOnHold => {
                LibraryError::no_active_loan_or_hold("You have no active loan or hold for this title.")
            }
            LicensorError::CannotLoan { message } => LibraryError::cannot_loan(message.as_str(), None),
            LicensorError::CannotHold { message } => LibraryError::cannot_hold(message.as_str(), None),
            LicensorError::CannotRenew { message } => LibraryError::cannot_renew(message.as_str(), None),
            LicensorError::CannotFulfill { message } => LibraryError::cannot_fulfill(message.as_str(), None),
            LicensorError::FormatNotAvailable { message } => LibraryError::format_not_available(message.as_str()),
            LicensorError::DeliveryMechanismConflict { message } => LibraryError::mechanism_conflict(message.as_str()),
            LicensorError::NotFoundOnRemote { message } => LibraryError::not_found_on_remote(message.as_str()),
            LicensorError::CannotReturn { message } => LibraryError::remote_refused_return(message.as_str()),
            LicensorError::CannotReleaseHold { message } => LibraryError::cannot_release_hold(message.as_str(), false),
            LicensorError::PatronLoanLimitReached { limit } => {
                LibraryError::loan_limit_reached(
                    format!("You have reached your loan limit of {}. You cannot borrow anything further until you return something.", limit).as_str(), limit)
            }
            LicensorError::PatronHoldLimitReached { limit } => {
                LibraryError::hold_limit_reached(
                    format!("You have reached your hold limit of {}. You cannot place another item on hold until you borrow something or remove a hold.", limit).as_str(), limit)
            }
            LicensorError::PatronAuthorizationFailed { message } => LibraryError::invalid_credentials(message.as_str()),
            LicensorError::Integration { service, message } => {
                LibraryError::remote_integration(message.as_str(), service.as_str())
            }
        }
    }
}

// LicensorApi is the capability the lending engine needs from an external
// licensor. One instance serves one licensor for one library.
#[async_trait]
pub trait LicensorApi: Sync + Send {
    fn name(&self) -> String;

    // false for licensors that keep no per-patron records, whose local loans
    // must never be reconciled away
    fn keeps_remote_records(&self) -> bool {
        true
    }

    async fn checkout(&self, ctx: &RequestContext, pool: &LicensePoolDto,
                      mechanism: Option<&DeliveryMechanismDto>) -> Result<CheckoutResult, LicensorError>;

    async fn place_hold(&self, ctx: &RequestContext, pool: &LicensePoolDto) -> Result<CheckoutResult, LicensorError>;

    async fn fulfill(&self, ctx: &RequestContext, pool: &LicensePoolDto, loan: &LoanDto,
                     mechanism: &DeliveryMechanismDto) -> Result<FulfillmentDto, LicensorError>;

    async fn return_loan(&self, ctx: &RequestContext, pool: &LicensePoolDto,
                         loan: &LoanDto) -> Result<Option<PoolAvailability>, LicensorError>;

    async fn release_hold(&self, ctx: &RequestContext, pool: &LicensePoolDto,
                          hold: &HoldDto) -> Result<Option<PoolAvailability>, LicensorError>;

    async fn sync_patron_activity(&self, ctx: &RequestContext) -> Result<Vec<RemoteActivity>, LicensorError>;
}

#[cfg(test)]
mod tests {
    use crate::core::library::LibraryError;
    use crate::licensor::LicensorError;

    #[tokio::test]
    async fn test_should_map_licensor_errors() {
        assert!(matches!(LibraryError::from(LicensorError::NoAvailableCopies), LibraryError::CannotLoan { .. }));
        assert!(matches!(LibraryError::from(LicensorError::CannotReturn { message: "refused".to_string() }),
            LibraryError::RemoteRefusedReturn { .. }));
        assert!(matches!(LibraryError::from(LicensorError::CannotReleaseHold { message: "busy".to_string() }),
            LibraryError::CannotReleaseHold { reserved: false, .. }));
        assert!(matches!(LibraryError::from(LicensorError::PatronLoanLimitReached { limit: 3 }),
            LibraryError::LoanLimitReached { limit: 3, .. }));
    }

    #[tokio::test]
    async fn test_should_keep_integration_service() {
        let err = LibraryError::from(LicensorError::integration("bibliotheca", "timed out"));
        match err {
            LibraryError::RemoteIntegration { service, message } => {
                assert_eq!("bibliotheca", service.as_str());
                assert_eq!("timed out", message.as_str());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
