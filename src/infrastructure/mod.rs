//! Infrastructure layer: cache backends, persistence, configuration,
//! logging, and process lifecycle.

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod database;
pub mod logging;

pub use bootstrap::{AppContext, BootstrapError};
