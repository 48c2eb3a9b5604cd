//! HTTP adapter tests against local wiremock servers

mod rewrite_tests;
