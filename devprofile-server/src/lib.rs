//! HTTP surface of the profile service.
//!
//! The binary is in `main.rs`; the router is exposed here so it can be
//! driven in-process.

pub mod api;
pub mod error;
pub mod webserver;

pub use webserver::{router, start_webserver};
