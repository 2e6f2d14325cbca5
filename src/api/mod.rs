//! API module for HTTP endpoints
//!
//! This module maps registry operations to REST endpoints and the live
//! reload notifications to a Server-Sent Events stream.

pub mod http;
pub mod rest;
pub mod sse;

pub use http::create_router;
