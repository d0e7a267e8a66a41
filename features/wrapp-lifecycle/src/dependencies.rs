use std::{collections::BTreeMap, fmt::Debug, sync::Arc};

use crate::{
    component::Component,
    errors::RequireError,
    types::Instance,
};

/// Started dependencies handed to a factory.
///
/// Only holds the components the factory's spec declared, keyed by their name.
#[derive(Clone, Default)]
pub struct Dependencies {
    instances: BTreeMap<String, Instance>,
}
impl Debug for Dependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, instance) in &self.instances {
            map.entry(name, &instance.info.type_name);
        }
        map.finish()
    }
}

impl Dependencies {
    pub(crate) fn new(instances: BTreeMap<String, Instance>) -> Self {
        Self { instances }
    }

    /// Attempts to get the dependency `name` as a `T`
    pub fn require<T: Component>(&self, name: &str) -> Result<Arc<T>, RequireError> {
        match self.instances.get(name) {
            Some(instance) => instance.require(name),
            None => Err(RequireError::ComponentNotFound(name.to_string())),
        }
    }

    /// Untyped access to the dependency `name`
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Component>> {
        self.instances.get(name).map(Instance::component)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instances.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
