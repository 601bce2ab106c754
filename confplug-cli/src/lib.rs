//! confplug command-line host library
//!
//! This module exports the internal components of the CLI for testing purposes.

pub mod builtin;
pub mod commands;
pub mod config;
