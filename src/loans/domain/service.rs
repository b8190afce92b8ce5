use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;
use crate::core::library::LibraryResult;
use crate::loans::domain::LoanService;
use crate::loans::domain::model::LoanEntity;
use crate::loans::dto::LoanDto;
use crate::loans::repository::LoanRepository;

pub(crate) struct LoanServiceImpl {
    loan_repository: Box<dyn LoanRepository>,
}

impl LoanServiceImpl {
    pub(crate) fn new(loan_repository: Box<dyn LoanRepository>) -> Self {
        Self {
            loan_repository,
        }
    }
}

#[async_trait]
impl LoanService for LoanServiceImpl {
    async fn add_loan(&self, loan: &LoanDto) -> LibraryResult<()> {
        self.loan_repository.create(&LoanEntity::from(loan)).await.map(|_| ())
    }

    async fn update_loan(&self, loan: &LoanDto) -> LibraryResult<LoanDto> {
        let mut entity = LoanEntity::from(loan);
        entity.updated_at = Utc::now().naive_utc();
        self.loan_repository.update(&entity).await?;
        entity.version += 1;
        Ok(LoanDto::from(&entity))
    }

    async fn remove_loan(&self, loan_id: &str) -> LibraryResult<()> {
        self.loan_repository.delete(loan_id).await.map(|_| ())
    }

    async fn find_loan(&self, patron_id: &str, pool_id: &str) -> LibraryResult<Option<LoanDto>> {
        let res = self.loan_repository.query(
            &HashMap::from([("patron_id".to_string(), patron_id.to_string()),
                ("pool_id".to_string(), pool_id.to_string())]), None, 10).await?;
        Ok(res.records.first().map(LoanDto::from))
    }

    async fn find_loans_by_patron(&self, patron_id: &str) -> LibraryResult<Vec<LoanDto>> {
        let predicate = HashMap::from([("patron_id".to_string(), patron_id.to_string())]);
        let mut loans = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = self.loan_repository.query(&predicate, next_page.as_deref(), 100).await?;
            loans.extend(res.records.iter().map(LoanDto::from));
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        Ok(loans)
    }
}

impl From<&LoanEntity> for LoanDto {
    fn from(other: &LoanEntity) -> Self {
        Self {
            loan_id: other.loan_id.to_string(),
            version: other.version,
            library_id: other.library_id.to_string(),
            patron_id: other.patron_id.to_string(),
            pool_id: other.pool_id.to_string(),
            licensor: other.licensor.to_string(),
            identifier_type: other.identifier_type.to_string(),
            identifier: other.identifier.to_string(),
            mechanism_id: other.mechanism_id.clone(),
            external_identifier: other.external_identifier.clone(),
            start: other.start,
            end: other.end,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&LoanDto> for LoanEntity {
    fn from(other: &LoanDto) -> Self {
        Self {
            loan_id: other.loan_id.to_string(),
            version: other.version,
            library_id: other.library_id.to_string(),
            patron_id: other.patron_id.to_string(),
            pool_id: other.pool_id.to_string(),
            licensor: other.licensor.to_string(),
            identifier_type: other.identifier_type.to_string(),
            identifier: other.identifier.to_string(),
            mechanism_id: other.mechanism_id.clone(),
            external_identifier: other.external_identifier.clone(),
            start: other.start,
            end: other.end,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}
