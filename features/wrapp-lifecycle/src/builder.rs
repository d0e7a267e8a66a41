use std::collections::{BTreeMap, HashSet};

use crate::{
    component::Component,
    dependencies::Dependencies,
    errors::BuildError,
    factories::{ComponentFactory, DynFactory, FnFactory, TryFnFactory},
    system::System,
    types::DynError,
};

/// Declaration of one component: how to build it and what it needs
pub struct ComponentSpec {
    pub(crate) factory: Box<dyn DynFactory>,
    pub(crate) dependencies: Vec<String>,
}

impl ComponentSpec {
    /// Spec from a factory which can't fail
    pub fn new<C, F>(factory: F) -> Self
    where
        C: Component,
        F: Fn(&Dependencies) -> C + Send + Sync + 'static,
    {
        Self::from_factory(FnFactory::new(factory))
    }

    /// Spec from a factory which may reject its dependencies
    pub fn try_new<C, E, F>(factory: F) -> Self
    where
        C: Component,
        E: Into<DynError> + 'static,
        F: Fn(&Dependencies) -> Result<C, E> + Send + Sync + 'static,
    {
        Self::from_factory(TryFnFactory::new(factory))
    }

    /// Spec from a [`ComponentFactory`], starting with the dependencies it declares
    pub fn from_factory<Factory: ComponentFactory + 'static>(factory: Factory) -> Self {
        let dependencies = factory.dependencies();
        Self {
            factory: Box::new(factory),
            dependencies,
        }
    }

    /// Appends names of components which have to be started before this one
    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

/// Collects component specs and turns them into a [`System`]
#[derive(Default)]
pub struct SystemBuilder {
    registered: Vec<(String, ComponentSpec)>,
}

impl SystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(mut self, name: impl Into<String>, spec: ComponentSpec) -> Self {
        self.registered.push((name.into(), spec));
        self
    }

    /// Checks names and dependency lists for duplicates
    ///
    /// Dependencies on unknown components are not rejected here,
    /// they fail once the system is started or stopped.
    pub fn build(self) -> Result<System, BuildError> {
        let mut components = BTreeMap::new();
        for (name, spec) in self.registered {
            let mut seen = HashSet::new();
            if let Some(duplicate) = spec.dependencies.iter().find(|dep| !seen.insert(*dep)) {
                return Err(BuildError::DuplicateDependency {
                    component: name,
                    dependency: duplicate.clone(),
                });
            }

            if components.contains_key(&name) {
                return Err(BuildError::DuplicateComponent(name));
            }
            components.insert(name, spec);
        }

        tracing::debug!("Built system with {} components", components.len());
        Ok(System::new(components))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;
    impl Component for Noop {
        fn start(&self) -> Result<(), DynError> {
            Ok(())
        }
        fn stop(&self) -> Result<(), DynError> {
            Ok(())
        }
    }

    struct NoopFactory;
    impl ComponentFactory for NoopFactory {
        type Provides = Noop;

        fn dependencies(&self) -> Vec<String> {
            vec!["config".to_string()]
        }

        fn construct(&self, _: &Dependencies) -> Result<Noop, DynError> {
            Ok(Noop)
        }
    }

    #[test]
    fn depends_on_appends_to_factory_dependencies() {
        let spec = ComponentSpec::from_factory(NoopFactory).depends_on(["db", "cache"]);
        assert_eq!(spec.dependencies(), ["config", "db", "cache"]);
    }

    #[test]
    fn duplicate_component_is_rejected() {
        let result = SystemBuilder::new()
            .component("a", ComponentSpec::new(|_| Noop))
            .component("a", ComponentSpec::new(|_| Noop))
            .build();

        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateComponent("a".to_string()))
        );
    }

    #[test]
    fn duplicate_dependency_is_rejected() {
        let result = SystemBuilder::new()
            .component("a", ComponentSpec::new(|_| Noop))
            .component("b", ComponentSpec::new(|_| Noop).depends_on(["a", "a"]))
            .build();

        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateDependency {
                component: "b".to_string(),
                dependency: "a".to_string(),
            })
        );
    }

    #[test]
    fn missing_dependency_builds() {
        let system = SystemBuilder::new()
            .component("a", ComponentSpec::new(|_| Noop).depends_on(["ghost"]))
            .build()
            .unwrap();

        assert_eq!(system.len(), 1);
    }
}
