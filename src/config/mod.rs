//! Configuration module for Park-Atlas
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and resolving the out-of-band API key for nearby-place lookups.
//!
//! # Example
//!
//! ```no_run
//! use park_atlas::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("atlas.toml")).unwrap();
//! println!("Directory site: {}", config.directory.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, DirectoryConfig, HttpConfig, NearbyConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, resolve_api_key};
pub use validation::validate;
