//! Unitforge Core Library
//!
//! This crate provides the error type and export configuration shared
//! across the unitforge crates.

pub mod error;
pub mod options;

pub use error::{Error, Result};
pub use options::ExportOptions;
