//! Library integration tests: plan, provision and relocate real environments.

mod common;
mod provision_tests;
