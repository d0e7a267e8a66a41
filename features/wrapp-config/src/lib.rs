//! Wrapp Config provides a registry of configs that components of a system can read
//! while they are constructed.
//!
//! Wrapp Config is split into two major parts:
//! 1. ConfigProvider: Used to create the registry of all configs, registered as a component
//! 2. Config<T>: A wrapper type to retrieve a config from the provider a factory depends on
//!
//! # Examples
//!
//! ```rust
//! use wrapp_config::provider::ConfigProvider;
//!
//! #[derive(Clone)]
//! struct AppConfig {
//!     host: String,
//!     port: u16,
//!     app_name: String,
//! }
//!
//! let app_config = AppConfig {
//!     host: "localhost".to_string(),
//!     port: 8080_u16,
//!     app_name: "My Awesome App".to_string(),
//! };
//!
//! let mut config_provider = ConfigProvider::new();
//! config_provider.add_config(app_config.clone()).unwrap();
//!
//! let retrieved_config = config_provider.get_config::<AppConfig>().unwrap();
//!
//! assert_eq!(app_config.host, retrieved_config.host);
//! assert_eq!(app_config.port, retrieved_config.port);
//! assert_eq!(app_config.app_name, retrieved_config.app_name);
//! ```
//!
//! Wrapp Config consists of the following components:
//!
//! 1. Config - for resolving a config out of injected dependencies
//! 2. Provider - for creating a registry of configs, adding and retrieving configs
//! 3. Errors - for config errors

pub mod config;
pub mod errors;
pub mod provider;

pub use config::Config;
pub use errors::{GetConfigError, RegisterConfigError};
pub use provider::ConfigProvider;
