//! `stocktake-app`
//!
//! **Responsibility:** the application around the counting core.
//!
//! This crate provides:
//! - Configuration from the environment
//! - One-shot catalog loading (file, or HTTP with the `http` feature)
//! - The counting session state machine
//! - A terminal front-end driving the session
//!
//! Parsing, aggregation and export rendering live in their own crates and stay
//! free of IO.

pub mod config;
pub mod loader;
pub mod session;
pub mod shell;

pub use config::{AppConfig, CatalogLocation};
pub use loader::{load_catalog, load_configured, CatalogSource, FileSource};
pub use session::{Session, SessionCommand, SessionEvent, Tab};
