//! End-to-end pipeline tests with fake services

mod pipeline_tests;
