//! Common utilities module
//!
//! This module contains shared utilities used across the mosaic pipeline.

pub mod error;

pub use error::{MosaicError, Result};
