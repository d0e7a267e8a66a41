use std::{
    any::{type_name, Any, TypeId},
    sync::Arc,
};

use crate::{component::Component, errors::RequireError};

/// Error type returned by component hooks and factories
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Started components are shared with their dependents and may be handed to other threads,
/// so anything managed by a system needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// A started component
///
/// Keeps two views of the same allocation: one to drive the lifecycle hooks,
/// one to recover the concrete type.
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    component: Arc<dyn Component>,
    any: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub(crate) fn new<C: Component>(component: C) -> Self {
        let component = Arc::new(component);
        Instance {
            info: TypeInfo::of::<C>(),
            component: component.clone(),
            any: component,
        }
    }

    pub fn component(&self) -> &Arc<dyn Component> {
        &self.component
    }

    pub fn downcast<T: Component>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.any.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.info.type_name),
        }
    }

    /// Downcast for a lookup of the component registered as `name`
    pub(crate) fn require<T: Component>(&self, name: &str) -> Result<Arc<T>, RequireError> {
        self.downcast()
            .map_err(|actual_type| RequireError::TypeMismatch {
                component: name.to_string(),
                required_type: type_name::<T>(),
                actual_type,
            })
    }
}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}
