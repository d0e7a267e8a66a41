use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use wrapp_lifecycle::{types::TypeInfo, Component, DynError};

use crate::errors::{GetConfigError, RegisterConfigError};

/// A provider to register all configs.
///
/// Configs can be registered and retrieved based on type.
/// The provider is itself a [`Component`], register it in a system and let
/// other components depend on it to read their configs.
#[derive(Clone, Default)]
pub struct ConfigProvider {
    configs: HashMap<TypeId, (TypeInfo, Arc<dyn Any + Send + Sync + 'static>)>,
}

impl ConfigProvider {
    /// Initializes an empty Config Provider
    pub fn new() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// Retrieve a config with specified type.
    ///
    /// If the config type is not available, it will return [`GetConfigError::Missing`]
    pub fn get_config<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, GetConfigError> {
        let info = TypeInfo::of::<T>();

        self.configs
            .get(&info.type_id)
            .and_then(|(_, entry)| entry.clone().downcast().ok())
            .ok_or(GetConfigError::Missing(info))
    }

    /// Add a config to the registry.
    ///
    /// If the config type is already registered, it will return a
    /// [`RegisterConfigError`] runtime error
    pub fn add_config<T: Send + Sync + 'static>(
        &mut self,
        config: T,
    ) -> Result<&mut Self, RegisterConfigError> {
        let info = TypeInfo::of::<T>();

        if self.configs.contains_key(&info.type_id) {
            return Err(RegisterConfigError::AlreadyRegistered(info));
        }

        self.configs.insert(info.type_id, (info, Arc::new(config)));
        Ok(self)
    }

    /// Can optionally add a config to the registry.
    ///
    /// If the config provided is `Some(T)`, it will be the same as calling [`ConfigProvider::add_config`]
    /// If the config provided is `None`, then the function just returns `Ok(self)` for chaining
    pub fn maybe_add_config<T: Send + Sync + 'static>(
        &mut self,
        config: Option<T>,
    ) -> Result<&mut Self, RegisterConfigError> {
        match config {
            Some(c) => self.add_config(c),
            None => Ok(self),
        }
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.configs.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl Component for ConfigProvider {
    fn start(&self) -> Result<(), DynError> {
        for (info, _) in self.configs.values() {
            tracing::debug!("Providing config {info}");
        }
        Ok(())
    }

    fn stop(&self) -> Result<(), DynError> {
        Ok(())
    }
}
