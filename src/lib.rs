pub mod circulation;
pub mod core;
pub mod delivery;
pub mod gateway;
pub mod holds;
pub mod licensor;
pub mod loans;
pub mod patrons;
pub mod policy;
pub mod utils;
pub mod works;
