//! Flows module - Operations built on top of the walk
//!
//! Provides:
//! - aggregate: Concatenate selected files into the output artifact
//! - summary: Run report rendering
//! - init: Starter ignore file

pub mod aggregate;
pub mod init;
pub mod summary;
