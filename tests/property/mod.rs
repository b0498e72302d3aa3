//! Property-based tests

mod event_proptest;
mod paths_proptest;
mod registry_proptest;
