use std::marker::PhantomData;

use crate::{
    component::Component,
    dependencies::Dependencies,
    types::{DynError, Instance, TypeInfo},
};

/// A Factory providing instances of a given component type
///
/// Closures are wrapped automatically by [`crate::ComponentSpec::new`] and
/// [`crate::ComponentSpec::try_new`]; implement this for factories which carry state
/// or want to declare their own dependencies.
pub trait ComponentFactory: Send + Sync {
    type Provides: Component;

    /// Names of the components this factory needs
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Constructs a new, not yet started, instance of the factory's provided type
    fn construct(&self, dependencies: &Dependencies) -> Result<Self::Provides, DynError>;
}

/// Wrapper Trait for factories, providing type erased instances
pub(crate) trait DynFactory: Send + Sync {
    fn supplies(&self) -> TypeInfo;

    fn construct(&self, dependencies: &Dependencies) -> Result<Instance, DynError>;
}
// Impl DynFactory for any ComponentFactory
impl<SpecificFactory: ComponentFactory> DynFactory for SpecificFactory {
    fn supplies(&self) -> TypeInfo {
        TypeInfo::of::<SpecificFactory::Provides>()
    }

    fn construct(&self, dependencies: &Dependencies) -> Result<Instance, DynError> {
        ComponentFactory::construct(self, dependencies).map(Instance::new)
    }
}

/// Infallible closure factory
pub(crate) struct FnFactory<F, C> {
    factory: F,
    _provides: PhantomData<fn() -> C>,
}
impl<F, C> FnFactory<F, C> {
    pub(crate) fn new(factory: F) -> Self {
        Self {
            factory,
            _provides: PhantomData,
        }
    }
}
impl<F, C> ComponentFactory for FnFactory<F, C>
where
    F: Fn(&Dependencies) -> C + Send + Sync,
    C: Component,
{
    type Provides = C;

    fn construct(&self, dependencies: &Dependencies) -> Result<C, DynError> {
        Ok((self.factory)(dependencies))
    }
}

/// Fallible closure factory
pub(crate) struct TryFnFactory<F, C, E> {
    factory: F,
    _provides: PhantomData<fn() -> Result<C, E>>,
}
impl<F, C, E> TryFnFactory<F, C, E> {
    pub(crate) fn new(factory: F) -> Self {
        Self {
            factory,
            _provides: PhantomData,
        }
    }
}
impl<F, C, E> ComponentFactory for TryFnFactory<F, C, E>
where
    F: Fn(&Dependencies) -> Result<C, E> + Send + Sync,
    C: Component,
    E: Into<DynError>,
{
    type Provides = C;

    fn construct(&self, dependencies: &Dependencies) -> Result<C, DynError> {
        (self.factory)(dependencies).map_err(Into::into)
    }
}
