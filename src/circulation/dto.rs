use serde::Serialize;
use crate::holds::dto::HoldDto;
use crate::loans::dto::LoanDto;

// BorrowOutcome says what a borrow produced and whether it is new, which
// decides between 201 and 200.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BorrowOutcome {
    Loan { loan: LoanDto, is_new: bool },
    Hold { hold: HoldDto, is_new: bool },
}

impl BorrowOutcome {
    pub fn is_new(&self) -> bool {
        match self {
            BorrowOutcome::Loan { is_new, .. } => *is_new,
            BorrowOutcome::Hold { is_new, .. } => *is_new,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RevokeOutcome {
    LoanReturned { loan: LoanDto },
    HoldReleased { hold: HoldDto },
}

// ActivityDto is the patron's loan or hold on one title.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityDto {
    Loan { loan: LoanDto },
    Hold { hold: HoldDto },
}

// Bookshelf is everything a patron has out or on hold. `synced` is false when
// it was served from local state without a successful licensor round-trip.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Bookshelf {
    pub loans: Vec<LoanDto>,
    pub holds: Vec<HoldDto>,
    pub synced: bool,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct SyncReport {
    pub loans_added: usize,
    pub loans_updated: usize,
    pub loans_removed: usize,
    pub holds_added: usize,
    pub holds_updated: usize,
    pub holds_removed: usize,
}
