use std::sync::Arc;

use thiserror::Error;

use crate::{dependency_graph::DependencyGraphError, types::DynError};

/// Errors when trying to get a started component
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequireError {
    /// There is no started instance under that name
    #[error("Component '{0}' not found - it is unknown or not started")]
    ComponentNotFound(String),

    #[error("Component '{component}' has the wrong type, required: '{required_type}' actual: '{actual_type}'")]
    TypeMismatch {
        component: String,
        required_type: &'static str,
        actual_type: &'static str,
    },
}

/// Errors while starting or stopping a system
#[derive(Error, Debug, Clone)]
pub enum LifecycleError {
    /// There are issues with the dependency graph
    #[error(transparent)]
    DependencyGraph(#[from] DependencyGraphError),

    /// A Factory failed to build
    #[error("Factory for '{component}' failed - error: {error:?}")]
    ConstructFailed {
        component: String,
        error: Arc<DynError>,
    },

    #[error("Component '{component}' failed to start - error: {error:?}")]
    StartFailed {
        component: String,
        error: Arc<DynError>,
    },

    #[error("Component '{component}' failed to stop - error: {error:?}")]
    StopFailed {
        component: String,
        error: Arc<DynError>,
    },
}

impl LifecycleError {
    /// Name of the component whose factory or hook failed
    pub fn component(&self) -> Option<&str> {
        match self {
            LifecycleError::DependencyGraph(_) => None,
            LifecycleError::ConstructFailed { component, .. }
            | LifecycleError::StartFailed { component, .. }
            | LifecycleError::StopFailed { component, .. } => Some(component.as_str()),
        }
    }
}

/// Errors when building a system from its specs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("A Component has been registered twice: '{0}'")]
    DuplicateComponent(String),

    #[error("'{component}' lists '{dependency}' more than once")]
    DuplicateDependency {
        component: String,
        dependency: String,
    },
}
