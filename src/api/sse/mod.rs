//! SSE (Server-Sent Events) module for live reload notifications
//!
//! ## Endpoints
//! - `GET /reload` - push-only stream, one `data:` frame per change
//!
//! The first frame is always `{"event":"connected"}`.

pub mod handler;

pub use handler::reload_handler;
