//! Wrapp Lifecycle starts and stops a system of named components in dependency order.
//!
//! A system is declared as a set of [`ComponentSpec`]s, each with a factory and the names
//! of the components it depends on:
//! 1. [`System::start`] orders the components so dependencies come first, constructs each
//!    one with its started dependencies injected and calls its start hook
//! 2. [`System::get`] hands out started components by name and type
//! 3. [`System::stop`] calls the stop hooks in the reverse order
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use wrapp_lifecycle::{Component, ComponentSpec, Dependencies, DynError, RequireError, System};
//!
//! struct Database;
//! impl Component for Database {
//!     fn start(&self) -> Result<(), DynError> { Ok(()) }
//!     fn stop(&self) -> Result<(), DynError> { Ok(()) }
//! }
//!
//! struct Api {
//!     database: Arc<Database>,
//! }
//! impl Component for Api {
//!     fn start(&self) -> Result<(), DynError> { Ok(()) }
//!     fn stop(&self) -> Result<(), DynError> { Ok(()) }
//! }
//!
//! let mut system = System::builder()
//!     .component("database", ComponentSpec::new(|_| Database))
//!     .component(
//!         "api",
//!         ComponentSpec::try_new(|deps: &Dependencies| {
//!             Ok::<_, RequireError>(Api { database: deps.require("database")? })
//!         })
//!         .depends_on(["database"]),
//!     )
//!     .build()
//!     .unwrap();
//!
//! system.start().unwrap();
//! assert!(system.get::<Api>("api").is_ok());
//!
//! system.stop().unwrap();
//! assert!(system.get::<Api>("api").is_err());
//! ```

pub mod builder;
pub mod component;
pub mod dependencies;
pub mod dependency_graph;
pub mod errors;
pub mod factories;
pub mod system;
pub mod types;

pub use builder::{ComponentSpec, SystemBuilder};
pub use component::Component;
pub use dependencies::Dependencies;
pub use dependency_graph::{DependencyGraph, DependencyGraphError, DependencyGraphErrors};
pub use errors::{BuildError, LifecycleError, RequireError};
pub use factories::ComponentFactory;
pub use system::System;
pub use types::{DynError, Injectable, Instance, TypeInfo};
