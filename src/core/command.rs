use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;
use crate::core::library::{LibraryError, PolicyDenial};
use crate::utils::date::opt_serializer;

// FailureKind is the stable, machine-readable name of a failure. Clients switch
// on it; the message is only for people.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    AlreadyCheckedOut,
    Expired,
    Blocked,
    FinesExceeded,
    HoldsDisabled,
    AudienceRestricted,
    NoLicenses,
    BadDeliveryMechanism,
    MechanismRequired,
    MechanismConflict,
    LoanLimitReached,
    HoldLimitReached,
    CannotLoan,
    CannotHold,
    CannotRenew,
    CannotFulfill,
    FormatNotAvailable,
    NotFoundOnRemote,
    NoActiveLoan,
    NoActiveLoanOrHold,
    CannotReleaseHold,
    RemoteRefusedReturn,
    MirrorFailed,
    RemoteIntegration,
    RemoteFetchFailed,
    InvalidCredentials,
    NotFound,
    Conflict,
    Validation,
    Internal,
}

// CommandError is the failure surface handed to presentation layers.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct CommandError {
    pub kind: FailureKind,
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_amount: Option<f64>,
    #[serde(with = "opt_serializer", skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

impl CommandError {
    pub fn new(kind: FailureKind, message: &str, status: u16) -> Self {
        CommandError {
            kind,
            message: message.to_string(),
            status,
            fine_amount: None,
            retry_after: None,
            debug: None,
        }
    }

    pub fn with_debug(mut self, debug: String) -> Self {
        self.debug = Some(debug);
        self
    }
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::AlreadyCheckedOut { message } => {
                CommandError::new(FailureKind::AlreadyCheckedOut, message.as_str(), 400)
            }
            LibraryError::PolicyDenied { denial } => {
                let message = denial.to_string();
                match denial {
                    PolicyDenial::Expired { .. } => {
                        CommandError::new(FailureKind::Expired, message.as_str(), 403)
                    }
                    PolicyDenial::Blocked { unblock_at, .. } => {
                        let mut err = CommandError::new(FailureKind::Blocked, message.as_str(), 403);
                        err.retry_after = unblock_at;
                        err
                    }
                    PolicyDenial::FinesExceeded { fines, .. } => {
                        let mut err = CommandError::new(FailureKind::FinesExceeded, message.as_str(), 403);
                        err.fine_amount = Some(fines);
                        err
                    }
                    PolicyDenial::HoldsDisabled => {
                        CommandError::new(FailureKind::HoldsDisabled, message.as_str(), 403)
                    }
                    PolicyDenial::AudienceRestricted { .. } => {
                        CommandError::new(FailureKind::AudienceRestricted, message.as_str(), 451)
                    }
                }
            }
            LibraryError::NoLicenses { message } => {
                CommandError::new(FailureKind::NoLicenses, message.as_str(), 404)
            }
            LibraryError::BadDeliveryMechanism { message } => {
                CommandError::new(FailureKind::BadDeliveryMechanism, message.as_str(), 400)
            }
            LibraryError::MechanismRequired { message } => {
                CommandError::new(FailureKind::MechanismRequired, message.as_str(), 400)
            }
            LibraryError::MechanismConflict { message } => {
                CommandError::new(FailureKind::MechanismConflict, message.as_str(), 409)
            }
            LibraryError::LoanLimitReached { message, .. } => {
                CommandError::new(FailureKind::LoanLimitReached, message.as_str(), 403)
            }
            LibraryError::HoldLimitReached { message, .. } => {
                CommandError::new(FailureKind::HoldLimitReached, message.as_str(), 403)
            }
            LibraryError::CannotLoan { message, reason_code } => {
                CommandError::new(FailureKind::CannotLoan, "Could not issue a loan for this book.", 502)
                    .with_debug(format!("{} {:?}", message, reason_code))
            }
            LibraryError::CannotHold { message, reason_code } => {
                CommandError::new(FailureKind::CannotHold, "Could not place a hold on this book.", 502)
                    .with_debug(format!("{} {:?}", message, reason_code))
            }
            LibraryError::CannotRenew { message, reason_code } => {
                CommandError::new(FailureKind::CannotRenew, "Could not renew this loan.", 400)
                    .with_debug(format!("{} {:?}", message, reason_code))
            }
            LibraryError::CannotFulfill { message, reason_code } => {
                CommandError::new(FailureKind::CannotFulfill, "Could not fulfill this loan.", 400)
                    .with_debug(format!("{} {:?}", message, reason_code))
            }
            LibraryError::FormatNotAvailable { message } => {
                CommandError::new(FailureKind::FormatNotAvailable, "This book is not available in the requested format.", 400)
                    .with_debug(message)
            }
            LibraryError::NotFoundOnRemote { message } => {
                CommandError::new(FailureKind::NotFoundOnRemote, "The licensor has no record of this book.", 404)
                    .with_debug(message)
            }
            LibraryError::NoActiveLoan { message } => {
                CommandError::new(FailureKind::NoActiveLoan, message.as_str(), 400)
            }
            LibraryError::NoActiveLoanOrHold { message } => {
                CommandError::new(FailureKind::NoActiveLoanOrHold, message.as_str(), 404)
            }
            LibraryError::CannotReleaseHold { message, reserved } => {
                let status = if reserved { 400 } else { 503 };
                CommandError::new(FailureKind::CannotReleaseHold, message.as_str(), status)
            }
            LibraryError::RemoteRefusedReturn { message } => {
                CommandError::new(FailureKind::RemoteRefusedReturn,
                                  "The licensor refused to accept the return. Your loan remains active.", 503)
                    .with_debug(message)
            }
            LibraryError::MirrorFailed { message, reason_code } => {
                CommandError::new(FailureKind::MirrorFailed,
                                  "The licensor accepted the change but it could not be recorded locally; it will be reconciled on next sync.", 503)
                    .with_debug(format!("{} {:?}", message, reason_code))
            }
            LibraryError::RemoteIntegration { message, service } => {
                CommandError::new(FailureKind::RemoteIntegration,
                                  format!("Error communicating with {}.", service).as_str(), 502)
                    .with_debug(message)
            }
            LibraryError::RemoteFetchFailed { message, url } => {
                CommandError::new(FailureKind::RemoteFetchFailed,
                                  "Could not retrieve the content for this loan. Your loan is still active.", 502)
                    .with_debug(format!("{}: {}", url, message))
            }
            LibraryError::InvalidCredentials { message } => {
                CommandError::new(FailureKind::InvalidCredentials, message.as_str(), 401)
            }
            LibraryError::NotFound { message } => {
                CommandError::new(FailureKind::NotFound, message.as_str(), 404)
            }
            LibraryError::DuplicateKey { message } => {
                CommandError::new(FailureKind::Conflict, message.as_str(), 409)
            }
            LibraryError::Validation { message, .. } => {
                CommandError::new(FailureKind::Validation, message.as_str(), 400)
            }
            LibraryError::Serialization { message } => {
                CommandError::new(FailureKind::Internal, "Internal error.", 500)
                    .with_debug(message)
            }
            LibraryError::Database { message, reason_code, retryable } => {
                CommandError::new(FailureKind::Internal, "Internal error.", 500)
                    .with_debug(format!("{} {:?} {}", message, reason_code, retryable))
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::new(FailureKind::Internal, "Internal error.", 500)
                    .with_debug(format!("{} {:?}", message, reason_code))
            }
        }
    }
}
