/// Credential and settings resolution.
pub mod config;
/// Tracing subscriber setup for the binary.
pub mod logging;
