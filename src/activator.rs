//! Activators decide how a registered component produces instances.
//!
//! A component either hands out a pre-built instance it was given
//! ([`Activator::Provided`]) or constructs a fresh one on every resolve by
//! autowiring it against the container ([`Activator::Autowired`]).
//!
//! Instances are stored type-erased as `Arc<dyn Any>` wrapping an `Arc<T>`,
//! so the same representation covers concrete types and trait objects.

use crate::provider::ServiceKey;
use crate::{Autowire, Container, FactoryError, Injectable, Result};
use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

/// Type-erased service instance. Always holds an `Arc<T>` for the service type T.
pub(crate) type ErasedService = Arc<dyn Any + Send + Sync>;

/// Type-erased autowiring recipe
type ActivateFn = Arc<dyn Fn(&Container) -> Result<ErasedService> + Send + Sync>;

/// Erase an `Arc<T>` for storage
#[inline]
pub(crate) fn erase<T: ?Sized + Injectable>(service: Arc<T>) -> ErasedService {
    Arc::new(service)
}

/// Recover the `Arc<T>` stored by [`erase`]
#[inline]
pub(crate) fn unerase<T: ?Sized + Injectable>(erased: &ErasedService) -> Result<Arc<T>> {
    erased.downcast_ref::<Arc<T>>().cloned().ok_or_else(|| {
        FactoryError::Internal(format!(
            "stored instance is not an Arc<{}>",
            std::any::type_name::<T>()
        ))
    })
}

// =============================================================================
// Resolution guard
// =============================================================================

thread_local! {
    /// Types currently being autowired on this thread, innermost last
    static RESOLVING: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

/// Marks a type as under construction for as long as the guard lives.
struct ResolutionGuard;

impl ResolutionGuard {
    fn enter(key: ServiceKey) -> Result<Self> {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.contains(&key.type_id) {
                return Err(FactoryError::CircularDependency {
                    type_name: key.type_name,
                });
            }
            stack.push(key.type_id);
            Ok(ResolutionGuard)
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

// =============================================================================
// Provided instance
// =============================================================================

/// A pre-built instance returned verbatim on every resolve
#[derive(Clone)]
pub(crate) struct ProvidedInstance {
    instance: ErasedService,
}

impl ProvidedInstance {
    #[inline]
    pub fn new<T: ?Sized + Injectable>(instance: Arc<T>) -> Self {
        Self {
            instance: erase(instance),
        }
    }

    #[inline]
    pub fn resolve(&self) -> ErasedService {
        Arc::clone(&self.instance)
    }
}

// =============================================================================
// Autowired activator
// =============================================================================

/// Constructs a new instance on every resolve via [`Autowire`].
///
/// The first instance produced is captured so a rebuild can carry it forward
/// as a fixed instance.
pub(crate) struct AutowiredActivator {
    activate: ActivateFn,
    captured: OnceCell<ErasedService>,
    /// Concrete type being constructed
    limit: ServiceKey,
}

impl AutowiredActivator {
    /// Autowire a `C` and bind it to the service type `I`
    pub fn new<I, C>(bind: fn(Arc<C>) -> Arc<I>) -> Self
    where
        I: ?Sized + Injectable,
        C: Autowire,
    {
        Self {
            activate: Arc::new(move |container| {
                let instance = C::autowire(container)?;
                Ok(erase(bind(Arc::new(instance))))
            }),
            captured: OnceCell::new(),
            limit: ServiceKey::of::<C>(),
        }
    }

    /// Build a new instance, guarding against re-entering the same type
    pub fn activate(&self, container: &Container) -> Result<ErasedService> {
        let _guard = ResolutionGuard::enter(self.limit)?;

        #[cfg(feature = "logging")]
        trace!(
            target: "generic_factory",
            service = self.limit.type_name,
            "Autowiring new instance"
        );

        let instance = (self.activate)(container)?;
        // first instance wins
        let _ = self.captured.set(Arc::clone(&instance));
        Ok(instance)
    }

    /// The first instance this activator produced, if any
    #[inline]
    pub fn captured(&self) -> Option<&ErasedService> {
        self.captured.get()
    }

    /// Same recipe, nothing captured yet
    #[inline]
    pub fn fork(&self) -> Self {
        Self {
            activate: Arc::clone(&self.activate),
            captured: OnceCell::new(),
            limit: self.limit,
        }
    }
}

// =============================================================================
// Activator
// =============================================================================

pub(crate) enum Activator {
    /// Pre-built instance
    Provided(ProvidedInstance),
    /// Fresh instance per resolve
    Autowired(AutowiredActivator),
}

impl Activator {
    #[inline]
    pub fn provided<T: ?Sized + Injectable>(instance: Arc<T>) -> Self {
        Activator::Provided(ProvidedInstance::new(instance))
    }

    #[inline]
    pub fn autowired<I, C>(bind: fn(Arc<C>) -> Arc<I>) -> Self
    where
        I: ?Sized + Injectable,
        C: Autowire,
    {
        Activator::Autowired(AutowiredActivator::new(bind))
    }

    /// Produce an instance
    #[inline]
    pub fn activate(&self, container: &Container) -> Result<ErasedService> {
        match self {
            Activator::Provided(p) => Ok(p.resolve()),
            Activator::Autowired(a) => a.activate(container),
        }
    }

    /// Check if this hands out a fixed instance
    #[inline]
    pub fn is_provided(&self) -> bool {
        matches!(self, Activator::Provided(_))
    }

    /// Copy for a new container, fixing whatever state this one holds.
    ///
    /// Provided instances stay as they are. An autowired activator that has
    /// produced an instance becomes that fixed instance; one that never ran
    /// keeps its recipe.
    pub fn freeze(&self) -> Activator {
        match self {
            Activator::Provided(p) => Activator::Provided(p.clone()),
            Activator::Autowired(a) => match a.captured() {
                Some(instance) => Activator::Provided(ProvidedInstance {
                    instance: Arc::clone(instance),
                }),
                None => Activator::Autowired(a.fork()),
            },
        }
    }
}
