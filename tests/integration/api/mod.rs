//! API integration tests

mod auth_test;
mod gate_test;
mod notifications_test;
mod projects_test;
