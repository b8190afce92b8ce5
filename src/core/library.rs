use std::fmt;
use std::fmt::{Display, Formatter};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// PolicyDenial describes why borrowing policy forbade an action, along with the
// data the caller needs to tell the patron how to fix it.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum PolicyDenial {
    Expired {
        expired_at: Option<NaiveDateTime>,
    },
    Blocked {
        reason: String,
        unblock_at: Option<NaiveDateTime>,
    },
    FinesExceeded {
        fines: f64,
        limit: f64,
    },
    HoldsDisabled,
    AudienceRestricted {
        audience: Audience,
    },
}

impl PolicyDenial {
    pub fn retry_after(&self) -> Option<NaiveDateTime> {
        match self {
            PolicyDenial::Blocked { unblock_at, .. } => *unblock_at,
            _ => None,
        }
    }
}

impl Display for PolicyDenial {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PolicyDenial::Expired { .. } => {
                write!(f, "Your library card has expired.")
            }
            PolicyDenial::Blocked { reason, unblock_at: Some(at) } => {
                write!(f, "Your library card has been suspended ({}) until {}.", reason, at)
            }
            PolicyDenial::Blocked { reason, unblock_at: None } => {
                write!(f, "Your library card has been suspended ({}).", reason)
            }
            PolicyDenial::FinesExceeded { fines, .. } => {
                write!(f, "You must pay your ${:.2} outstanding fines before you can borrow more books.", fines)
            }
            PolicyDenial::HoldsDisabled => {
                write!(f, "Library policy prohibits the placement of holds.")
            }
            PolicyDenial::AudienceRestricted { .. } => {
                write!(f, "Library policy prohibits us from lending you this book.")
            }
        }
    }
}

#[derive(Debug)]
pub enum LibraryError {
    AlreadyCheckedOut {
        message: String,
    },
    PolicyDenied {
        denial: PolicyDenial,
    },
    NoLicenses {
        message: String,
    },
    BadDeliveryMechanism {
        message: String,
    },
    MechanismRequired {
        message: String,
    },
    MechanismConflict {
        message: String,
    },
    LoanLimitReached {
        message: String,
        limit: usize,
    },
    HoldLimitReached {
        message: String,
        limit: usize,
    },
    CannotLoan {
        message: String,
        reason_code: Option<String>,
    },
    CannotHold {
        message: String,
        reason_code: Option<String>,
    },
    CannotRenew {
        message: String,
        reason_code: Option<String>,
    },
    CannotFulfill {
        message: String,
        reason_code: Option<String>,
    },
    FormatNotAvailable {
        message: String,
    },
    NotFoundOnRemote {
        message: String,
    },
    NoActiveLoan {
        message: String,
    },
    NoActiveLoanOrHold {
        message: String,
    },
    // reserved is true when the hold is already waiting for the patron, in which
    // case the licensor was never asked to release it.
    CannotReleaseHold {
        message: String,
        reserved: bool,
    },
    RemoteRefusedReturn {
        message: String,
    },
    // The licensor confirmed a transition but the local record could not be
    // brought in line; the next sync has to reconcile the two.
    MirrorFailed {
        message: String,
        reason_code: Option<String>,
    },
    RemoteIntegration {
        message: String,
        service: String,
    },
    RemoteFetchFailed {
        message: String,
        url: String,
    },
    InvalidCredentials {
        message: String,
    },
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn already_checked_out(message: &str) -> LibraryError {
        LibraryError::AlreadyCheckedOut { message: message.to_string() }
    }

    pub fn policy_denied(denial: PolicyDenial) -> LibraryError {
        LibraryError::PolicyDenied { denial }
    }

    pub fn no_licenses(message: &str) -> LibraryError {
        LibraryError::NoLicenses { message: message.to_string() }
    }

    pub fn bad_delivery_mechanism(message: &str) -> LibraryError {
        LibraryError::BadDeliveryMechanism { message: message.to_string() }
    }

    pub fn mechanism_required(message: &str) -> LibraryError {
        LibraryError::MechanismRequired { message: message.to_string() }
    }

    pub fn mechanism_conflict(message: &str) -> LibraryError {
        LibraryError::MechanismConflict { message: message.to_string() }
    }

    pub fn loan_limit_reached(message: &str, limit: usize) -> LibraryError {
        LibraryError::LoanLimitReached { message: message.to_string(), limit }
    }

    pub fn hold_limit_reached(message: &str, limit: usize) -> LibraryError {
        LibraryError::HoldLimitReached { message: message.to_string(), limit }
    }

    pub fn cannot_loan(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::CannotLoan { message: message.to_string(), reason_code }
    }

    pub fn cannot_hold(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::CannotHold { message: message.to_string(), reason_code }
    }

    pub fn cannot_renew(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::CannotRenew { message: message.to_string(), reason_code }
    }

    pub fn cannot_fulfill(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::CannotFulfill { message: message.to_string(), reason_code }
    }

    pub fn format_not_available(message: &str) -> LibraryError {
        LibraryError::FormatNotAvailable { message: message.to_string() }
    }

    pub fn not_found_on_remote(message: &str) -> LibraryError {
        LibraryError::NotFoundOnRemote { message: message.to_string() }
    }

    pub fn no_active_loan(message: &str) -> LibraryError {
        LibraryError::NoActiveLoan { message: message.to_string() }
    }

    pub fn no_active_loan_or_hold(message: &str) -> LibraryError {
        LibraryError::NoActiveLoanOrHold { message: message.to_string() }
    }

    pub fn cannot_release_hold(message: &str, reserved: bool) -> LibraryError {
        LibraryError::CannotReleaseHold { message: message.to_string(), reserved }
    }

    pub fn remote_refused_return(message: &str) -> LibraryError {
        LibraryError::RemoteRefusedReturn { message: message.to_string() }
    }

    pub fn mirror_failed(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::MirrorFailed { message: message.to_string(), reason_code }
    }

    pub fn remote_integration(message: &str, service: &str) -> LibraryError {
        LibraryError::RemoteIntegration { message: message.to_string(), service: service.to_string() }
    }

    pub fn remote_fetch_failed(message: &str, url: &str) -> LibraryError {
        LibraryError::RemoteFetchFailed { message: message.to_string(), url: url.to_string() }
    }

    pub fn invalid_credentials(message: &str) -> LibraryError {
        LibraryError::InvalidCredentials { message: message.to_string() }
    }

    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn database_or_not_found(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                return LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str());
            } else if reason_val.as_str().contains("ConditionalCheckFailed") {
                return LibraryError::database(
                    format!("stale or duplicate record {:?}", message).as_str(), reason, false);
            }
        }
        LibraryError::database(
            format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, retryable)
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::RemoteIntegration { .. } => { true }
            LibraryError::RemoteFetchFailed { .. } => { true }
            LibraryError::MirrorFailed { .. } => { true }
            _ => { false }
        }
    }

    // Storage failures are the only kinds the lending state machine converts
    // into MirrorFailed once the licensor has already confirmed a transition.
    pub fn is_storage(&self) -> bool {
        matches!(self, LibraryError::Database { .. } | LibraryError::DuplicateKey { .. } |
            LibraryError::NotFound { .. } | LibraryError::Serialization { .. } | LibraryError::Runtime { .. })
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::PolicyDenied { denial } => {
                write!(f, "{}", denial)
            }
            LibraryError::AlreadyCheckedOut { message } |
            LibraryError::NoLicenses { message } |
            LibraryError::BadDeliveryMechanism { message } |
            LibraryError::MechanismRequired { message } |
            LibraryError::MechanismConflict { message } |
            LibraryError::FormatNotAvailable { message } |
            LibraryError::NotFoundOnRemote { message } |
            LibraryError::NoActiveLoan { message } |
            LibraryError::NoActiveLoanOrHold { message } |
            LibraryError::RemoteRefusedReturn { message } |
            LibraryError::InvalidCredentials { message } |
            LibraryError::DuplicateKey { message } |
            LibraryError::NotFound { message } |
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::LoanLimitReached { message, limit } |
            LibraryError::HoldLimitReached { message, limit } => {
                write!(f, "{} (limit {})", message, limit)
            }
            LibraryError::CannotLoan { message, reason_code } |
            LibraryError::CannotHold { message, reason_code } |
            LibraryError::CannotRenew { message, reason_code } |
            LibraryError::CannotFulfill { message, reason_code } |
            LibraryError::MirrorFailed { message, reason_code } |
            LibraryError::Validation { message, reason_code } |
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::CannotReleaseHold { message, reserved } => {
                write!(f, "{} reserved={}", message, reserved)
            }
            LibraryError::RemoteIntegration { message, service } => {
                write!(f, "{}: {}", service, message)
            }
            LibraryError::RemoteFetchFailed { message, url } => {
                write!(f, "{}: {}", url, message)
            }
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for the circulation engine.
pub type LibraryResult<T> = Result<T, LibraryError>;

// It defines abstraction for paginated result
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    // The page number or token
    pub page: Option<String>,
    // page size
    pub page_size: usize,
    // Next page if available
    pub next_page: Option<String>,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(page: Option<&str>, page_size: usize,
                      next_page: Option<String>, records: Vec<T>) -> Self {
        PaginatedResult {
            page: page.map(str::to_string),
            page_size,
            next_page,
            records,
        }
    }
}

// Hold lifecycle as reported by the licensor. A hold becomes Reserved once a copy
// has been set aside for this patron specifically.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum HoldStatus {
    Queued,
    Reserved,
}

impl From<String> for HoldStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Queued" => HoldStatus::Queued,
            "Reserved" => HoldStatus::Reserved,
            _ => HoldStatus::Queued,
        }
    }
}

impl Display for HoldStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            HoldStatus::Queued => write!(f, "Queued"),
            HoldStatus::Reserved => write!(f, "Reserved"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Audience {
    Adult,
    AdultsOnly,
    YoungAdult,
    Children,
}

impl From<String> for Audience {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Adult" => Audience::Adult,
            "AdultsOnly" => Audience::AdultsOnly,
            "YoungAdult" => Audience::YoungAdult,
            "Children" => Audience::Children,
            _ => Audience::Adult,
        }
    }
}

impl Display for Audience {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Audience::Adult => write!(f, "Adult"),
            Audience::AdultsOnly => write!(f, "AdultsOnly"),
            Audience::YoungAdult => write!(f, "YoungAdult"),
            Audience::Children => write!(f, "Children"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crate::core::library::{Audience, HoldStatus, LibraryError, PolicyDenial};

    #[tokio::test]
    async fn test_should_create_taxonomy_errors() {
        assert!(matches!(LibraryError::already_checked_out("test"), LibraryError::AlreadyCheckedOut{ .. }));
        assert!(matches!(LibraryError::policy_denied(PolicyDenial::HoldsDisabled), LibraryError::PolicyDenied{ denial: PolicyDenial::HoldsDisabled }));
        assert!(matches!(LibraryError::no_licenses("test"), LibraryError::NoLicenses{ .. }));
        assert!(matches!(LibraryError::mechanism_conflict("test"), LibraryError::MechanismConflict{ .. }));
        assert!(matches!(LibraryError::cannot_release_hold("test", true), LibraryError::CannotReleaseHold{ reserved: true, .. }));
        assert!(matches!(LibraryError::mirror_failed("test", None), LibraryError::MirrorFailed{ .. }));
        assert!(matches!(LibraryError::remote_fetch_failed("test", "http://x"), LibraryError::RemoteFetchFailed{ .. }));
    }

    #[tokio::test]
    async fn test_should_create_database_or_not_found_error() {
        assert!(matches!(LibraryError::database_or_not_found("test", Some("404".to_string()), false), LibraryError::NotFound{ message: _ }));
        assert!(matches!(LibraryError::database_or_not_found("test", Some("ConditionalCheckFailedException".to_string()), false), LibraryError::Database{ retryable: false, .. }));
        assert!(matches!(LibraryError::database_or_not_found("test", None, true), LibraryError::Database{ retryable: true, .. }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert_eq!(false, LibraryError::database("test", None, false).retryable());
        assert_eq!(true, LibraryError::database("test", None, true).retryable());
        assert_eq!(true, LibraryError::remote_integration("test", "licensor").retryable());
        assert_eq!(false, LibraryError::cannot_loan("test", None).retryable());
        assert_eq!(false, LibraryError::policy_denied(PolicyDenial::HoldsDisabled).retryable());
    }

    #[tokio::test]
    async fn test_should_render_fine_amount() {
        let err = LibraryError::policy_denied(PolicyDenial::FinesExceeded { fines: 50.0, limit: 10.0 });
        assert_eq!("You must pay your $50.00 outstanding fines before you can borrow more books.", err.to_string());
    }

    #[tokio::test]
    async fn test_should_expose_unblock_time() {
        let at = NaiveDate::from_ymd_opt(2030, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
        let denial = PolicyDenial::Blocked { reason: "lost items".to_string(), unblock_at: Some(at) };
        assert_eq!(Some(at), denial.retry_after());
        assert_eq!(None, PolicyDenial::HoldsDisabled.retry_after());
    }

    #[tokio::test]
    async fn test_should_format_statuses() {
        for status in vec![HoldStatus::Queued, HoldStatus::Reserved] {
            assert_eq!(status, HoldStatus::from(status.to_string()));
        }
        for audience in vec![Audience::Adult, Audience::AdultsOnly, Audience::YoungAdult, Audience::Children] {
            assert_eq!(audience, Audience::from(audience.to_string()));
        }
    }
}
