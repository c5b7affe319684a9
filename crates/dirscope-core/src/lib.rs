//! Core types for dirscope.
//!
//! This crate provides the data structures shared by the scan and search
//! engines: the immutable [`FileNode`] tree, the [`ScanError`] taxonomy,
//! scan configuration, and tree statistics.

mod config;
mod error;
mod node;
mod stats;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::ScanError;
pub use node::{FileNode, Iter};
pub use stats::TreeStats;
