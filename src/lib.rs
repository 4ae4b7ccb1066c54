//! Clipforge - short-form video generation pipeline
//!
//! This library crate exposes the core functionality for integration testing.

pub mod artifacts;
pub mod config;
pub mod pipeline;
pub mod providers;
pub mod server;
