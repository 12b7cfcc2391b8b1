//! HTTP/SSE control surface
//!
//! Exposes the playback engine, social services and calendar to browser
//! UIs and test harnesses.

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{create_router, run, AppContext};
