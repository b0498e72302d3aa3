//! Integration tests
//!
//! Router-level tests over in-memory stores, registry scenarios and
//! environment-driven configuration.

mod api;
mod config_test;
mod realtime;
