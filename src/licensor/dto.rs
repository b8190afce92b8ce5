use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::utils::date::{opt_serializer, serializer};
use crate::works::dto::PoolAvailability;

// LoanInfo is a loan as the licensor reports it.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LoanInfo {
    #[serde(with = "serializer")]
    pub start: NaiveDateTime,
    #[serde(with = "opt_serializer", default)]
    pub end: Option<NaiveDateTime>,
    pub mechanism_id: Option<String>,
    pub external_identifier: Option<String>,
}

// HoldInfo is a hold as the licensor reports it.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct HoldInfo {
    #[serde(with = "serializer")]
    pub start: NaiveDateTime,
    #[serde(with = "opt_serializer", default)]
    pub end: Option<NaiveDateTime>,
    pub position: Option<i64>,
    pub reserved: bool,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum CheckoutOutcome {
    Loan(LoanInfo),
    Hold(HoldInfo),
}

// CheckoutResult is the licensor's answer to a checkout or hold request, with
// the pool counters as they stand after it, when the licensor reports them.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CheckoutResult {
    pub outcome: CheckoutOutcome,
    pub availability: Option<PoolAvailability>,
}

impl CheckoutResult {
    pub fn loan(info: LoanInfo) -> Self {
        Self { outcome: CheckoutOutcome::Loan(info), availability: None }
    }

    pub fn hold(info: HoldInfo) -> Self {
        Self { outcome: CheckoutOutcome::Hold(info), availability: None }
    }

    pub fn with_availability(mut self, availability: PoolAvailability) -> Self {
        self.availability = Some(availability);
        self
    }
}

// RemoteActivity is one loan or hold the licensor knows the patron has.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum RemoteActivity {
    Loan { identifier_type: String, identifier: String, info: LoanInfo },
    Hold { identifier_type: String, identifier: String, info: HoldInfo },
}

impl RemoteActivity {
    pub fn identifier(&self) -> (&str, &str) {
        match self {
            RemoteActivity::Loan { identifier_type, identifier, .. } => (identifier_type.as_str(), identifier.as_str()),
            RemoteActivity::Hold { identifier_type, identifier, .. } => (identifier_type.as_str(), identifier.as_str()),
        }
    }
}
