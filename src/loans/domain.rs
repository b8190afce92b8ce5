pub mod model;
pub mod service;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::loans::dto::LoanDto;

// LoanService keeps the local loan records. Only the lending state machine
// writes them, and only after the licensor confirmed the change.
#[async_trait]
pub trait LoanService: Sync + Send {
    async fn add_loan(&self, loan: &LoanDto) -> LibraryResult<()>;
    // returns the loan with its new version
    async fn update_loan(&self, loan: &LoanDto) -> LibraryResult<LoanDto>;
    async fn remove_loan(&self, loan_id: &str) -> LibraryResult<()>;
    async fn find_loan(&self, patron_id: &str, pool_id: &str) -> LibraryResult<Option<LoanDto>>;
    async fn find_loans_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<LoanDto>>;
}
