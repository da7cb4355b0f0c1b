//! isoenv-lib: Core types and logic for isoenv
//!
//! This crate provides everything needed to provision an isolated interpreter
//! environment:
//! - `interpreter`: locating and validating the base interpreter
//! - `config`: merging options from the command line, environment and config file
//! - `layout`: planning the directory tree of an environment
//! - `provision`: materializing a plan and making environments relocatable
//! - `script`: patching scripts so they activate their environment

pub mod config;
pub mod consts;
pub mod interpreter;
pub mod layout;
pub mod platform;
pub mod provision;
pub mod script;

#[cfg(test)]
pub(crate) mod testutil;
