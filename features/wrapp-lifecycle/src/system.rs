use std::{
    collections::BTreeMap,
    fmt::Debug,
    sync::Arc,
};

use crate::{
    builder::{ComponentSpec, SystemBuilder},
    component::Component,
    dependencies::Dependencies,
    dependency_graph::{DependencyGraph, DependencyGraphErrors},
    errors::{LifecycleError, RequireError},
    factories::DynFactory,
    types::Instance,
};

/// A set of named components and their lifecycle state
///
/// Components are started in dependency order and stopped in the reverse order.
/// Both directions are idempotent: started components are not started again,
/// stopped components are not stopped again.
///
/// A failed start or stop is not rolled back. The components handled before the
/// failing one keep their new state, so calling [`System::start`] or [`System::stop`]
/// again after fixing the cause only handles the remaining ones.
pub struct System {
    components: BTreeMap<String, ComponentSlot>,
    graph: DependencyGraph,
}

struct ComponentSlot {
    factory: Box<dyn DynFactory>,
    /// Some while started
    instance: Option<Instance>,
}

impl Debug for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("System");
        for (name, slot) in &self.components {
            let val = if slot.instance.is_some() {
                "started"
            } else {
                "stopped"
            };
            map.field(name, &val);
        }
        map.finish()
    }
}

impl System {
    pub fn builder() -> SystemBuilder {
        SystemBuilder::new()
    }

    pub(crate) fn new(specs: BTreeMap<String, ComponentSpec>) -> Self {
        let mut graph = DependencyGraph::new();
        let mut components = BTreeMap::new();
        for (name, spec) in specs {
            graph.add(name.clone(), spec.dependencies);
            components.insert(
                name,
                ComponentSlot {
                    factory: spec.factory,
                    instance: None,
                },
            );
        }

        Self { components, graph }
    }

    /// Constructs and starts every component which is not started yet
    ///
    /// Each factory gets the already started instances of its declared dependencies.
    /// Aborts on the first failing factory or start hook.
    pub fn start(&mut self) -> Result<&mut Self, LifecycleError> {
        let order = self.graph.resolve()?;
        tracing::debug!("Starting system with {} components", order.len());

        for name in &order {
            if self.is_started(name) {
                tracing::trace!("Component '{name}' is already started");
                continue;
            }

            let dependencies = self.dependencies_of(name);
            let Some(slot) = self.components.get_mut(name) else {
                continue;
            };

            tracing::debug!(
                "Constructing '{name}' ({}) with {} dependencies",
                slot.factory.supplies(),
                dependencies.len()
            );
            let instance = slot.factory.construct(&dependencies).map_err(|error| {
                LifecycleError::ConstructFailed {
                    component: name.clone(),
                    error: Arc::new(error),
                }
            })?;

            instance
                .component()
                .start()
                .map_err(|error| LifecycleError::StartFailed {
                    component: name.clone(),
                    error: Arc::new(error),
                })?;

            tracing::debug!("Started component '{name}' ({})", instance.info);
            slot.instance = Some(instance);
        }

        Ok(self)
    }

    /// Stops every started component, dependents before their dependencies
    ///
    /// Aborts on the first failing stop hook, that component stays started.
    pub fn stop(&mut self) -> Result<&mut Self, LifecycleError> {
        let order = self.graph.resolve()?;
        tracing::debug!("Stopping system with {} components", order.len());

        for name in order.iter().rev() {
            let Some(slot) = self.components.get_mut(name) else {
                continue;
            };
            let Some(instance) = &slot.instance else {
                tracing::trace!("Component '{name}' is already stopped");
                continue;
            };

            instance
                .component()
                .stop()
                .map_err(|error| LifecycleError::StopFailed {
                    component: name.clone(),
                    error: Arc::new(error),
                })?;

            tracing::debug!("Stopped component '{name}' ({})", instance.info);
            slot.instance = None;
        }

        Ok(self)
    }

    /// Attempts to get the started component `name` as a `T`
    pub fn get<T: Component>(&self, name: &str) -> Result<Arc<T>, RequireError> {
        match self.instance(name) {
            Some(instance) => instance.require(name),
            None => Err(RequireError::ComponentNotFound(name.to_string())),
        }
    }

    /// Untyped access to the started component `name`
    pub fn component(&self, name: &str) -> Option<&Arc<dyn Component>> {
        self.instance(name).map(Instance::component)
    }

    pub fn is_started(&self, name: &str) -> bool {
        self.instance(name).is_some()
    }

    /// Names of all started components
    pub fn started(&self) -> impl Iterator<Item = &str> {
        self.components
            .iter()
            .filter(|(_, slot)| slot.instance.is_some())
            .map(|(name, _)| name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// The order components are started in
    pub fn resolve(&self) -> Result<Vec<String>, LifecycleError> {
        Ok(self.graph.resolve()?)
    }

    /// Reports every missing and circular dependency at once
    pub fn validate(&self) -> Result<(), DependencyGraphErrors> {
        self.graph.check()
    }

    fn instance(&self, name: &str) -> Option<&Instance> {
        self.components
            .get(name)
            .and_then(|slot| slot.instance.as_ref())
    }

    /// Started instances of the declared dependencies of `name`
    fn dependencies_of(&self, name: &str) -> Dependencies {
        let instances = self
            .graph
            .dependencies_of(name)
            .iter()
            .filter_map(|dependency| {
                self.instance(dependency)
                    .map(|instance| (dependency.clone(), instance.clone()))
            })
            .collect();

        Dependencies::new(instances)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    };

    use super::*;
    use crate::{dependency_graph::DependencyGraphError, types::DynError};

    #[derive(Default)]
    struct Config {
        started: AtomicBool,
    }
    impl Component for Config {
        fn start(&self) -> Result<(), DynError> {
            self.started.store(true, Ordering::SeqCst);
            Ok(())
        }
        fn stop(&self) -> Result<(), DynError> {
            self.started.store(false, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Other;
    impl Component for Other {
        fn start(&self) -> Result<(), DynError> {
            Ok(())
        }
        fn stop(&self) -> Result<(), DynError> {
            Ok(())
        }
    }

    fn config(_: &Dependencies) -> Config {
        Config::default()
    }

    fn system() -> System {
        System::builder()
            .component("testComponent1", ComponentSpec::new(config))
            .component(
                "testComponent2",
                ComponentSpec::new(config).depends_on(["testComponent1"]),
            )
            .component(
                "testComponent3",
                ComponentSpec::new(config).depends_on(["testComponent2"]),
            )
            .component(
                "testComponent4",
                ComponentSpec::new(config).depends_on(["testComponent1", "testComponent5"]),
            )
            .component(
                "testComponent5",
                ComponentSpec::new(config).depends_on(["testComponent3"]),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn start_system() {
        let mut system = system();
        system.start().unwrap();

        let config = system.get::<Config>("testComponent3").unwrap();
        assert!(config.started.load(Ordering::SeqCst));
        assert_eq!(system.started().count(), 5);
        assert!(system.component("testComponent1").is_some());
        assert_eq!(
            system.names().collect::<Vec<_>>(),
            [
                "testComponent1",
                "testComponent2",
                "testComponent3",
                "testComponent4",
                "testComponent5"
            ]
        );
        assert_eq!(
            system.graph().dependencies_of("testComponent4"),
            ["testComponent1", "testComponent5"]
        );
        assert!(!system.graph().is_empty());
        assert_eq!(
            system.graph().names().collect::<Vec<_>>(),
            system.names().collect::<Vec<_>>()
        );

        system.stop().unwrap();
        assert!(system.component("testComponent1").is_none());
    }

    #[test]
    fn stop_system() {
        let mut system = system();
        system.start().unwrap();
        let config = system.get::<Config>("testComponent3").unwrap();

        system.stop().unwrap();

        assert_eq!(
            system.get::<Config>("testComponent3").err(),
            Some(RequireError::ComponentNotFound("testComponent3".to_string()))
        );
        assert!(!config.started.load(Ordering::SeqCst));
        assert_eq!(system.started().count(), 0);
    }

    #[test]
    fn get_before_start_is_not_found() {
        let system = system();
        assert!(matches!(
            system.get::<Config>("testComponent1"),
            Err(RequireError::ComponentNotFound(_))
        ));
        assert!(matches!(
            system.get::<Config>("unknown"),
            Err(RequireError::ComponentNotFound(_))
        ));
    }

    #[test]
    fn get_with_wrong_type_is_a_mismatch() {
        let mut system = system();
        system.start().unwrap();

        match system.get::<Other>("testComponent1") {
            Err(RequireError::TypeMismatch {
                component,
                required_type,
                actual_type,
            }) => {
                assert_eq!(component, "testComponent1");
                assert!(required_type.ends_with("Other"));
                assert!(actual_type.ends_with("Config"));
            }
            other => panic!("expected a type mismatch, got {:?}", other.err()),
        }
    }

    #[test]
    fn factory_only_sees_declared_dependencies() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        let mut system = System::builder()
            .component("a", ComponentSpec::new(config))
            .component("b", ComponentSpec::new(config))
            .component(
                "c",
                ComponentSpec::new(move |deps: &Dependencies| {
                    let names = deps.names().map(str::to_string).collect::<Vec<_>>();
                    recorder.lock().unwrap().extend(names);
                    Config::default()
                })
                .depends_on(["b"]),
            )
            .build()
            .unwrap();
        system.start().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn injected_dependency_is_the_started_instance() {
        struct Service {
            config: Arc<Config>,
        }
        impl Component for Service {
            fn start(&self) -> Result<(), DynError> {
                match self.config.started.load(Ordering::SeqCst) {
                    true => Ok(()),
                    false => Err("config is not started".into()),
                }
            }
            fn stop(&self) -> Result<(), DynError> {
                Ok(())
            }
        }

        let mut system = System::builder()
            .component("config", ComponentSpec::new(config))
            .component(
                "service",
                ComponentSpec::try_new(|deps: &Dependencies| {
                    Ok::<_, RequireError>(Service {
                        config: deps.require("config")?,
                    })
                })
                .depends_on(["config"]),
            )
            .build()
            .unwrap();
        system.start().unwrap();

        let service = system.get::<Service>("service").unwrap();
        let config = system.get::<Config>("config").unwrap();
        assert!(Arc::ptr_eq(&service.config, &config));
    }

    #[test]
    fn failing_factory_aborts_start() {
        let mut system = System::builder()
            .component("config", ComponentSpec::new(config))
            .component(
                "service",
                ComponentSpec::try_new(|deps: &Dependencies| {
                    deps.require::<Other>("config").map(|_| Other)
                })
                .depends_on(["config"]),
            )
            .build()
            .unwrap();

        let err = system.start().unwrap_err();
        assert!(matches!(err, LifecycleError::ConstructFailed { .. }));
        assert_eq!(err.component(), Some("service"));
        assert!(system.is_started("config"));
        assert!(!system.is_started("service"));
    }

    #[test]
    fn invalid_dependency_starts_nothing() {
        let mut system = System::builder()
            .component("a", ComponentSpec::new(config))
            .component("b", ComponentSpec::new(config).depends_on(["ghost"]))
            .build()
            .unwrap();

        let err = system.start().unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::DependencyGraph(DependencyGraphError::InvalidDependency { .. })
        ));
        assert_eq!(system.started().count(), 0);
        assert!(system.stop().is_err());
    }

    #[test]
    fn empty_system_has_empty_graph() {
        let system = System::builder().build().unwrap();
        assert!(system.graph().is_empty());
        assert_eq!(system.graph().names().count(), 0);
        assert_eq!(system.names().count(), 0);
    }

    #[test]
    fn debug_lists_component_state() {
        let mut system = System::builder()
            .component("config", ComponentSpec::new(config))
            .build()
            .unwrap();

        assert_eq!(format!("{system:?}"), r#"System { config: "stopped" }"#);
        system.start().unwrap();
        assert_eq!(format!("{system:?}"), r#"System { config: "started" }"#);
    }
}
