//! Web server for the hosting platform's liveness probe
//!
//! Runs alongside the Discord bot. It reports only that the process is up.

mod server;

pub use server::{start_web_server, AppState, WebServerConfig};
