//! Registration builder and the immutable container it produces
//!
//! A [`ContainerBuilder`] collects registrations. [`ContainerBuilder::build`]
//! turns them into a [`Container`], which never changes afterwards: adding
//! or removing a registration means building a new one.

use crate::activator::{unerase, Activator};
use crate::context::{ComponentContext, LifetimeScope, Scope};
use crate::provider::{ServiceKey, ServiceKind};
use crate::registry::{Component, ComponentRegistry};
use crate::{Autowire, FactoryError, Injectable, Result};
use std::any::TypeId;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Collects registrations for a [`Container`].
///
/// Registering the same service type again replaces the earlier registration.
///
/// # Examples
///
/// ```rust
/// use generic_factory::ContainerBuilder;
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock(u64);
///
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 { self.0 }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_instance::<dyn Clock>(Arc::new(FixedClock(42)));
///
/// let container = builder.build();
/// assert_eq!(container.resolve::<dyn Clock>().unwrap().now(), 42);
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    registry: ComponentRegistry,
}

impl ContainerBuilder {
    /// Create an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` to be constructed through [`Autowire`] on every resolve.
    #[inline]
    pub fn register_autowired<T: Autowire>(&mut self) -> &mut Self {
        self.register_autowired_as::<T, T>(|instance| instance)
    }

    /// Register `C` to be autowired on every resolve of the service `I`.
    ///
    /// `bind` turns the concrete instance into the service type, usually a
    /// plain unsizing coercion such as `|c| c`.
    ///
    /// ```rust
    /// use generic_factory::{Autowire, Container, ContainerBuilder, Result};
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    ///
    /// impl Greeter for English {
    ///     fn greet(&self) -> String { "hello".into() }
    /// }
    ///
    /// impl Autowire for English {
    ///     fn autowire(_: &Container) -> Result<Self> { Ok(English) }
    /// }
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.register_autowired_as::<dyn Greeter, English>(|c| c);
    ///
    /// let greeter = builder.build().resolve::<dyn Greeter>().unwrap();
    /// assert_eq!(greeter.greet(), "hello");
    /// ```
    pub fn register_autowired_as<I, C>(&mut self, bind: fn(Arc<C>) -> Arc<I>) -> &mut Self
    where
        I: ?Sized + Injectable,
        C: Autowire,
    {
        #[cfg(feature = "logging")]
        trace!(
            target: "generic_factory",
            service = std::any::type_name::<I>(),
            limit_type = std::any::type_name::<C>(),
            "Registering autowired component"
        );

        self.register_component(Component::new(
            ServiceKey::of::<I>(),
            ServiceKey::of::<C>(),
            ServiceKind::of::<I>(),
            Activator::autowired(bind),
        ))
    }

    /// Register a pre-built instance, returned as-is on every resolve.
    ///
    /// `T` may be a trait object; the registration then counts as an
    /// interface registration whose implementation type is `T` itself.
    pub fn register_instance<T: ?Sized + Injectable>(&mut self, instance: Arc<T>) -> &mut Self {
        #[cfg(feature = "logging")]
        trace!(
            target: "generic_factory",
            service = std::any::type_name::<T>(),
            "Registering provided instance"
        );

        self.register_component(Component::new(
            ServiceKey::of::<T>(),
            ServiceKey::of::<T>(),
            ServiceKind::of::<T>(),
            Activator::provided(instance),
        ))
    }

    /// Register a pre-built `C` as the service `I`, remembering `C` as the
    /// implementation type.
    pub fn register_instance_as<I, C>(
        &mut self,
        instance: Arc<C>,
        bind: fn(Arc<C>) -> Arc<I>,
    ) -> &mut Self
    where
        I: ?Sized + Injectable,
        C: Injectable,
    {
        #[cfg(feature = "logging")]
        trace!(
            target: "generic_factory",
            service = std::any::type_name::<I>(),
            limit_type = std::any::type_name::<C>(),
            "Registering provided instance"
        );

        self.register_component(Component::new(
            ServiceKey::of::<I>(),
            ServiceKey::of::<C>(),
            ServiceKind::of::<I>(),
            Activator::provided(bind(instance)),
        ))
    }

    #[inline]
    pub(crate) fn register_component(&mut self, component: Component) -> &mut Self {
        self.registry.insert(component);
        self
    }

    /// Move every registration of `other` into this builder, replacing
    /// registrations for the same service.
    pub(crate) fn overlay(&mut self, other: ContainerBuilder) -> &mut Self {
        for component in other.registry.into_components() {
            self.registry.insert(component);
        }
        self
    }

    /// Number of registrations collected so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Check if a registration for `T` has been collected.
    #[inline]
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains(&TypeId::of::<T>())
    }

    /// Build the immutable container.
    ///
    /// The container gets a fresh [`Scope`] and registers its own
    /// [`LifetimeScope`] and [`ComponentContext`] alongside the user
    /// registrations.
    pub fn build(mut self) -> Container {
        let scope = Scope::new();
        let services: Vec<&'static str> = self
            .registry
            .iter()
            .filter(|c| !c.is_internal())
            .map(|c| c.service().type_name)
            .collect();

        #[cfg(feature = "logging")]
        debug!(
            target: "generic_factory",
            scope_id = scope.id(),
            components = services.len(),
            "Building container"
        );

        self.registry.insert(Component::internal(
            ServiceKey::of::<LifetimeScope>(),
            Activator::provided(Arc::new(LifetimeScope::new(scope))),
        ));
        self.registry.insert(Component::internal(
            ServiceKey::of::<ComponentContext>(),
            Activator::provided(Arc::new(ComponentContext::new(scope, services))),
        ));

        Container {
            registry: self.registry,
            scope,
        }
    }
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("registrations", &self.len())
            .finish()
    }
}

/// An immutable, built set of registrations that resolves services.
///
/// # Examples
///
/// ```rust
/// use generic_factory::ContainerBuilder;
/// use std::sync::Arc;
///
/// struct Settings { name: String }
///
/// let mut builder = ContainerBuilder::new();
/// let settings = Arc::new(Settings { name: "test".into() });
/// builder.register_instance(Arc::clone(&settings));
///
/// let container = builder.build();
/// let resolved = container.resolve::<Settings>().unwrap();
/// assert!(Arc::ptr_eq(&settings, &resolved));
/// ```
pub struct Container {
    registry: ComponentRegistry,
    scope: Scope,
}

impl Container {
    /// Resolve a service.
    ///
    /// Provided instances come back as the same `Arc`; autowired components
    /// are constructed anew, resolving their own dependencies from this
    /// container. Re-entering a type that is still being constructed fails
    /// with [`FactoryError::CircularDependency`].
    pub fn resolve<T: ?Sized + Injectable>(&self) -> Result<Arc<T>> {
        let Some(component) = self.registry.get(&TypeId::of::<T>()) else {
            #[cfg(feature = "logging")]
            debug!(
                target: "generic_factory",
                service = std::any::type_name::<T>(),
                scope_id = self.scope.id(),
                "Service not registered"
            );
            return Err(FactoryError::not_found::<T>());
        };

        #[cfg(feature = "logging")]
        trace!(
            target: "generic_factory",
            service = std::any::type_name::<T>(),
            provided = component.is_provided_instance(),
            scope_id = self.scope.id(),
            "Resolving service"
        );

        let erased = component.activator.activate(self)?;
        unerase::<T>(&erased)
    }

    /// Try to resolve, returning None on any failure.
    #[inline]
    pub fn try_resolve<T: ?Sized + Injectable>(&self) -> Option<Arc<T>> {
        self.resolve::<T>().ok()
    }

    /// Check if a service is registered.
    #[inline]
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains(&TypeId::of::<T>())
    }

    /// All registrations in registration order, framework services included.
    #[inline]
    pub fn registrations(&self) -> impl Iterator<Item = &Component> {
        self.registry.iter()
    }

    /// Number of registrations, framework services included.
    #[inline]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Identity of this container.
    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("scope", &self.scope)
            .field("registrations", &self.len())
            .finish()
    }
}
