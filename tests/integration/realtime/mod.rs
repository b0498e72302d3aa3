//! Real-time integration tests

mod registry_test;
mod websocket_test;
