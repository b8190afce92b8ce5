pub(crate) mod ddb_loan_repository;
pub(crate) mod memory_loan_repository;

use crate::core::repository::Repository;
use crate::loans::domain::model::LoanEntity;

pub(crate) trait LoanRepository: Repository<LoanEntity> {}
