//! Provider traits for the factory
//!
//! These traits define what types can be registered and how autowired
//! types obtain their dependencies.

use crate::{Container, Result};
use std::any::TypeId;

/// Marker trait for types that can be registered with the container.
///
/// This is automatically implemented for all types that are
/// `Send + Sync + 'static`, including trait objects such as
/// `dyn Clock + Send + Sync`. You never need to implement this manually.
pub trait Injectable: Send + Sync + 'static {}

// Blanket implementation - everything that's Send + Sync + 'static is Injectable
impl<T: ?Sized + Send + Sync + 'static> Injectable for T {}

/// Types the container can construct by resolving their dependencies.
///
/// This is the explicit counterpart of property autowiring: the
/// implementation pulls each dependency out of the container it is given.
/// Implement it by hand, or with `#[derive(Autowire)]` when the `derive`
/// feature is enabled.
///
/// # Examples
///
/// ```rust
/// use generic_factory::{Autowire, Container, ContainerBuilder, Result};
/// use std::sync::Arc;
///
/// struct Config { retries: u32 }
///
/// struct Client { config: Arc<Config> }
///
/// impl Autowire for Client {
///     fn autowire(container: &Container) -> Result<Self> {
///         Ok(Self { config: container.resolve::<Config>()? })
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_instance(Arc::new(Config { retries: 3 }));
/// builder.register_autowired::<Client>();
///
/// let client = builder.build().resolve::<Client>().unwrap();
/// assert_eq!(client.config.retries, 3);
/// ```
pub trait Autowire: Injectable + Sized {
    /// Construct `Self`, resolving every dependency from `container`.
    fn autowire(container: &Container) -> Result<Self>;
}

/// Whether a registration is keyed by a concrete type or by an interface.
///
/// Interfaces are dynamically sized service types, in practice trait
/// objects. The rebuild pass re-binds interface registrations to their
/// interface type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServiceKind {
    /// A sized type, registered under itself
    #[default]
    Concrete,

    /// A trait object (or other unsized type) standing in for an implementation
    Interface,
}

impl ServiceKind {
    /// Classify a service type.
    ///
    /// Pointers to unsized types carry metadata and are wider than a thin
    /// pointer, which is how trait objects are told apart from concrete types.
    #[inline]
    pub fn of<T: ?Sized>() -> Self {
        if size_of::<*const T>() == size_of::<*const ()>() {
            ServiceKind::Concrete
        } else {
            ServiceKind::Interface
        }
    }

    /// Check if this is an interface registration
    #[inline]
    pub fn is_interface(&self) -> bool {
        matches!(self, ServiceKind::Interface)
    }
}

/// Identity of a type inside the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    /// TypeId of the type
    pub type_id: TypeId,
    /// Human-readable type name
    pub type_name: &'static str,
}

impl ServiceKey {
    /// Create the key for type T
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl std::fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Clock: Send + Sync {}

    struct SystemClock;

    #[test]
    fn test_kind_of_concrete() {
        assert_eq!(ServiceKind::of::<SystemClock>(), ServiceKind::Concrete);
        assert_eq!(ServiceKind::of::<String>(), ServiceKind::Concrete);
    }

    #[test]
    fn test_kind_of_trait_object() {
        assert_eq!(ServiceKind::of::<dyn Clock>(), ServiceKind::Interface);
        assert!(ServiceKind::of::<dyn Clock + Send + Sync>().is_interface());
    }

    #[test]
    fn test_service_key_identity() {
        assert_eq!(ServiceKey::of::<SystemClock>(), ServiceKey::of::<SystemClock>());
        assert_ne!(ServiceKey::of::<SystemClock>(), ServiceKey::of::<dyn Clock>());
        assert!(ServiceKey::of::<SystemClock>().to_string().ends_with("SystemClock"));
    }
}
