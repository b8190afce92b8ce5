pub(crate) mod ddb_hold_repository;
pub(crate) mod memory_hold_repository;

use crate::core::repository::Repository;
use crate::holds::domain::model::HoldEntity;

pub(crate) trait HoldRepository: Repository<HoldEntity> {}
