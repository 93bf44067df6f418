//! Fetcher implementations for reading branch package lists

pub mod rdb;

pub use rdb::RdbFetcher;
