//! Test suites for the checker
//!
//! - `mocks`: hand-written service fakes shared by the suites
//! - `property`: proptest invariants for tokenizing, merging, and annotation
//! - `unit`: HTTP adapters against wiremock servers
//! - `integration`: the full check pipeline with fake services

mod integration;
mod mocks;
mod property;
mod unit;
