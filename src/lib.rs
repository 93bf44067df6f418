pub mod branch;
pub mod compare;
pub mod config;
pub mod logging;
pub mod output;
