pub(crate) mod ddb_patron_repository;
pub(crate) mod memory_patron_repository;

use crate::core::repository::Repository;
use crate::patrons::domain::model::PatronEntity;

pub(crate) trait PatronRepository: Repository<PatronEntity> {}
