// src/config/mod.rs

//! Configuration loading and validation for herald.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate handler entries and the log pattern (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{CONFIG_ENV, load_and_validate, load_from_path, resolve_config_path};
pub use model::{ConfigFile, HandlerList, RawConfigFile};
pub use validate::validate_config;
