//! Core module - Configuration, patterns and file reading
//!
//! This module provides:
//! - Run configuration and tool-directory conventions
//! - Ignore-pattern loading and matching
//! - Error types
//! - Logging setup
//! - Path normalization utilities
//! - File reading strategies
//! - Token counting for the run report

pub mod config;
pub mod error;
pub mod file_reader;
pub mod logging;
pub mod paths;
pub mod patterns;
pub mod tokenizer;
pub mod util;
