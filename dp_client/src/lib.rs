//! Front ends for the dealer portal.
//!
//! This library provides the HTTP API client, configuration, logging,
//! command parsing and the CLI and TUI front ends used by the dp_client
//! binary.

pub mod api_client;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod tui_app;
