pub(crate) mod ddb_pool_repository;
pub(crate) mod memory_pool_repository;

use crate::core::repository::Repository;
use crate::works::domain::model::LicensePoolEntity;

pub(crate) trait LicensePoolRepository: Repository<LicensePoolEntity> {}
