use std::{ops::Deref, sync::Arc};

use wrapp_lifecycle::Dependencies;

use crate::{errors::GetConfigError, provider::ConfigProvider};

/// A wrapper type to allow for config injections
///
/// This provides a simple way to retrieve configs from a [`ConfigProvider`]
/// a factory depends on.
///
/// # Example
/// ```rust
/// use wrapp_config::{config::Config, provider::ConfigProvider};
/// use wrapp_lifecycle::{Component, ComponentSpec, Dependencies, DynError, System};
///
/// pub struct ServerConfig {
///     port: u16,
/// }
///
/// struct Server {
///     port: u16,
/// }
/// impl Component for Server {
///     fn start(&self) -> Result<(), DynError> { Ok(()) }
///     fn stop(&self) -> Result<(), DynError> { Ok(()) }
/// }
///
/// let mut provider = ConfigProvider::new();
/// provider.add_config(ServerConfig { port: 8080 }).unwrap();
///
/// let mut system = System::builder()
///     .component("config", ComponentSpec::new(move |_| provider.clone()))
///     .component(
///         "server",
///         ComponentSpec::try_new(|deps: &Dependencies| {
///             let config = Config::<ServerConfig>::resolve(deps, "config")?;
///             Ok::<_, DynError>(Server { port: config.port })
///         })
///         .depends_on(["config"]),
///     )
///     .build()
///     .unwrap();
///
/// system.start().unwrap();
/// assert_eq!(system.get::<Server>("server").unwrap().port, 8080);
/// ```
pub struct Config<T> {
    inner: Arc<T>,
}
impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<T> Config<T> {
    pub fn inner(&self) -> Arc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}

impl<T: Send + Sync + 'static> Config<T> {
    /// Takes the config out of the [`ConfigProvider`] registered as the dependency `provider`
    pub fn resolve(dependencies: &Dependencies, provider: &str) -> Result<Self, GetConfigError> {
        let provider = dependencies.require::<ConfigProvider>(provider)?;

        Ok(Config {
            inner: provider.get_config()?,
        })
    }
}
