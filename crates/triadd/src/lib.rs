//! Triad daemon library - exposes modules for testing.

pub mod clients;
pub mod config;
pub mod dispatch;
pub mod routes;
pub mod server;
