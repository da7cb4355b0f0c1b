//! End-to-end tests that create real environments with a fake interpreter.

mod common;
mod create_tests;
mod relocate_tests;
