//! Shared test utilities

pub mod fetcher;

#[allow(unused_imports)]
pub use fetcher::{FakeFetcher, record};
