//! Branch comparison layer
//!
//! This module provides the core functionality for fetching the binary package
//! sets of two repository branches and diffing them per architecture.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Fetcher   │────▶│    Index    │────▶│   Engine    │
//! │   (fetch)   │     │ (arch/name) │     │   (diff)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                   ┌─────────────┬─────────────┐
//! │  Fetchers   │                   │ Comparator  │   Report    │
//! │    (rdb)    │                   │(version cmp)│  (shaping)  │
//! └─────────────┘                   └─────────────┴─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`comparator`]: Version and release ordering strategies
//! - [`engine`]: Diff of two branches into a categorized report
//! - [`error`]: Error types for fetch operations
//! - [`fetcher`]: Fetcher trait for reading branch package lists
//! - [`fetchers`]: Concrete fetcher implementations (rdb)
//! - [`index`]: Architecture → name lookup table over package records
//! - [`report`]: Report categories, buckets and skeleton construction
//! - [`types`]: Common types like `PackageRecord`

pub mod comparator;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod fetchers;
pub mod index;
pub mod report;
pub mod types;
