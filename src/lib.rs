// ABOUTME: Library root for deploy-relay - exposes the workflow for testing.
// ABOUTME: The main binary is in main.rs.

pub mod codehost;
pub mod config;
pub mod deploy;
pub mod error;
pub mod http;
pub mod output;
pub mod target;
pub mod types;
