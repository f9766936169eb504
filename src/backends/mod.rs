//! Backends module - File system traversal
//!
//! Provides:
//! - walk: Ignore-aware directory walk with walkdir

pub mod walk;
