pub mod dto;
pub mod fetcher;
pub mod resolver;
