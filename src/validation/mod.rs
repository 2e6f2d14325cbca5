//! Input validation for registry requests
//!
//! This module provides the checks applied before any mutation happens.

mod types;

pub use types::{resolve_label, validate_key, WriteRequest};
