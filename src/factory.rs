//! Test-harness facade over the container
//!
//! [`GenericFactory`] keeps a pending [`ContainerBuilder`] and the live
//! [`Container`] built from it. Operations that need to resolve
//! materialize the container on demand; operations that change
//! registrations mark it stale so the next one rebuilds it.
//!
//! A rebuild carries every registration of the live container forward into
//! a brand-new builder, so instances that were already handed out (or
//! substituted) survive it:
//!
//! - the container's own [`LifetimeScope`](crate::LifetimeScope) and
//!   [`ComponentContext`](crate::ComponentContext) are dropped, a new
//!   container registers its own;
//! - provided instances are copied as-is, concrete ones under their own type
//!   and interface ones bound to their interface type;
//! - autowired components that already produced an instance are frozen to
//!   that instance;
//! - registrations made since the last build are laid on top.

use crate::context::is_framework_service;
use crate::registry::Component;
use crate::{Autowire, Container, ContainerBuilder, FactoryError, Injectable, Result};
use std::any::TypeId;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::debug;

/// Creates objects with their dependencies resolved and lets tests swap
/// services out.
///
/// One factory belongs to one test. It is not synchronized; every operation
/// takes `&mut self`.
///
/// # Examples
///
/// ```rust
/// use generic_factory::{Autowire, Container, GenericFactory, Result};
/// use std::sync::Arc;
///
/// trait Mailer: Send + Sync {
///     fn send(&self, to: &str) -> bool;
/// }
///
/// struct FakeMailer;
///
/// impl Mailer for FakeMailer {
///     fn send(&self, _: &str) -> bool { true }
/// }
///
/// struct Signup {
///     mailer: Arc<dyn Mailer>,
/// }
///
/// impl Autowire for Signup {
///     fn autowire(container: &Container) -> Result<Self> {
///         Ok(Signup { mailer: container.resolve::<dyn Mailer>()? })
///     }
/// }
///
/// let mut factory = GenericFactory::new();
/// let fake: Arc<dyn Mailer> = Arc::new(FakeMailer);
/// factory.register_or_replace(Some(Arc::clone(&fake))).unwrap();
///
/// let signup = factory.create_instance::<Signup>().unwrap();
/// assert!(Arc::ptr_eq(&signup.mailer, &fake));
/// assert!(signup.mailer.send("someone@example.com"));
/// ```
#[derive(Default)]
pub struct GenericFactory {
    /// Registrations made since the live container was built
    pending: ContainerBuilder,
    /// Live container, if one has been built
    container: Option<Container>,
    /// Pending registrations must be folded into the live container
    stale: bool,
}

impl GenericFactory {
    /// Create a factory with no registrations.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new instance of `T`, resolving its dependencies.
    ///
    /// `T` is registered for autowiring on top of whatever is already
    /// registered, the container is rebuilt and a freshly constructed `T` is
    /// returned. Resolution errors are passed through unchanged.
    pub fn create_instance<T: Autowire>(&mut self) -> Result<Arc<T>> {
        #[cfg(feature = "logging")]
        debug!(
            target: "generic_factory",
            service = std::any::type_name::<T>(),
            "Creating instance"
        );

        self.pending.register_autowired::<T>();
        self.stale = true;
        self.container().resolve::<T>()
    }

    /// Register `service` for `T`, replacing any existing registration.
    ///
    /// The exact `Arc` is returned by every later resolution of `T`. `None`
    /// is rejected with [`FactoryError::InvalidArgument`]. The replacement
    /// takes effect on the next operation that resolves.
    pub fn register_or_replace<T: ?Sized + Injectable>(
        &mut self,
        service: Option<Arc<T>>,
    ) -> Result<()> {
        let service = service.ok_or_else(|| FactoryError::invalid_argument("service"))?;

        #[cfg(feature = "logging")]
        debug!(
            target: "generic_factory",
            service = std::any::type_name::<T>(),
            "Registering or replacing service instance"
        );

        self.pending.register_instance(service);
        self.stale = true;
        Ok(())
    }

    /// Register `service` as the service `I`, recording `C` as its
    /// implementation type.
    ///
    /// Behaves like [`register_or_replace`](Self::register_or_replace);
    /// the difference shows in [`remove_service`](Self::remove_service),
    /// which matches on the implementation type.
    pub fn register_or_replace_as<I, C>(
        &mut self,
        service: Option<Arc<C>>,
        bind: fn(Arc<C>) -> Arc<I>,
    ) -> Result<()>
    where
        I: ?Sized + Injectable,
        C: Injectable,
    {
        let service = service.ok_or_else(|| FactoryError::invalid_argument("service"))?;

        #[cfg(feature = "logging")]
        debug!(
            target: "generic_factory",
            service = std::any::type_name::<I>(),
            limit_type = std::any::type_name::<C>(),
            "Registering or replacing service instance"
        );

        self.pending.register_instance_as(service, bind);
        self.stale = true;
        Ok(())
    }

    /// Forget every registration, pending and built.
    pub fn clear_all(&mut self) {
        #[cfg(feature = "logging")]
        debug!(
            target: "generic_factory",
            pending = self.pending.len(),
            had_container = self.container.is_some(),
            "Clearing all registrations"
        );

        self.pending = ContainerBuilder::new();
        self.container = None;
        self.stale = false;
    }

    /// Drop every registration whose implementation type is exactly `S`.
    ///
    /// The match is on the implementation (limit) type, not on the service
    /// type: an interface registered through
    /// [`register_or_replace_as`](Self::register_or_replace_as) is removed
    /// by naming its implementation, and naming the interface leaves it in
    /// place. Remaining registrations are carried forward with the same
    /// freezing rules as a rebuild; the next operation builds from them.
    pub fn remove_service<S: ?Sized + 'static>(&mut self) {
        let removed = TypeId::of::<S>();
        let mut survivors = ContainerBuilder::new();
        let mut dropped = 0usize;

        for component in self.container().registrations() {
            if is_framework_service(component.service().type_id) {
                continue;
            }
            if component.limit_type().type_id == removed {
                dropped += 1;
                continue;
            }
            survivors.register_component(component.frozen());
        }

        #[cfg(feature = "logging")]
        debug!(
            target: "generic_factory",
            service = std::any::type_name::<S>(),
            removed = dropped,
            remaining = survivors.len(),
            "Removed service registrations"
        );
        #[cfg(not(feature = "logging"))]
        let _ = dropped;

        self.pending = survivors;
        self.container = None;
        self.stale = false;
    }

    /// Check whether `T` can currently be resolved.
    #[inline]
    pub fn is_registered<T: ?Sized + 'static>(&mut self) -> bool {
        self.container().is_registered::<T>()
    }

    /// Resolve `T` from the current registrations.
    #[inline]
    pub fn resolve<T: ?Sized + Injectable>(&mut self) -> Result<Arc<T>> {
        self.container().resolve::<T>()
    }

    /// User registrations of the current container, in registration order.
    pub fn registrations(&mut self) -> impl Iterator<Item = &Component> {
        self.container().registrations().filter(|c| !is_framework_service(c.service().type_id))
    }

    /// Number of user registrations in the current container.
    #[inline]
    pub fn len(&mut self) -> usize {
        self.registrations().count()
    }

    #[inline]
    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// The live container, built or rebuilt first when needed.
    pub fn container(&mut self) -> &Container {
        let container = match self.container.take() {
            None => std::mem::take(&mut self.pending).build(),
            Some(live) if self.stale => self.rebuild(&live),
            Some(live) => live,
        };
        self.stale = false;
        self.container.insert(container)
    }

    /// Carry the live container's registrations into a new one and lay the
    /// pending registrations on top.
    fn rebuild(&mut self, live: &Container) -> Container {
        let mut builder = ContainerBuilder::new();

        // Concrete and interface registrations keep their service key, so
        // interfaces stay bound to the interface type.
        for component in live.registrations() {
            if is_framework_service(component.service().type_id) {
                continue;
            }
            builder.register_component(component.frozen());
        }

        #[cfg(feature = "logging")]
        debug!(
            target: "generic_factory",
            previous_scope = live.scope().id(),
            carried = builder.len(),
            pending = self.pending.len(),
            "Rebuilding container"
        );

        builder.overlay(std::mem::take(&mut self.pending));
        builder.build()
    }
}

impl std::fmt::Debug for GenericFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericFactory")
            .field("pending", &self.pending.len())
            .field("container", &self.container)
            .field("stale", &self.stale)
            .finish()
    }
}
