//! # Generic Factory - object creation with substitutable dependencies for tests
//!
//! A test builds the object under test with [`GenericFactory::create_instance`],
//! which constructs it and every dependency it declares. Before that, the test
//! can swap any dependency for a fake with
//! [`GenericFactory::register_or_replace`]; the exact instance it hands in is
//! what the object receives.
//!
//! ## Features
//!
//! - **Explicit autowiring** - types declare their dependencies through
//!   [`Autowire`], by hand or with `#[derive(Autowire)]`
//! - **Trait-object services** - register and resolve `dyn Trait` directly
//! - **Stable substitutions** - rebuilding the container keeps every instance
//!   already registered or handed out
//! - **Caller-owned state** - one factory per test, no globals
//! - **Observable** - optional tracing integration with JSON or pretty output
//!
//! ## Quick Start
//!
//! ```rust
//! use generic_factory::{Autowire, Container, GenericFactory, Result};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FrozenClock(u64);
//!
//! impl Clock for FrozenClock {
//!     fn now(&self) -> u64 { self.0 }
//! }
//!
//! struct Invoice {
//!     clock: Arc<dyn Clock>,
//! }
//!
//! impl Autowire for Invoice {
//!     fn autowire(container: &Container) -> Result<Self> {
//!         Ok(Invoice { clock: container.resolve::<dyn Clock>()? })
//!     }
//! }
//!
//! let mut factory = GenericFactory::new();
//! factory.register_or_replace::<dyn Clock>(Some(Arc::new(FrozenClock(1_700_000_000)))).unwrap();
//!
//! let invoice = factory.create_instance::<Invoice>().unwrap();
//! assert_eq!(invoice.clock.now(), 1_700_000_000);
//! ```
//!
//! ## Replacing and removing services
//!
//! ```rust
//! use generic_factory::GenericFactory;
//! use std::sync::Arc;
//!
//! struct Endpoint(&'static str);
//!
//! let mut factory = GenericFactory::new();
//! factory.register_or_replace(Some(Arc::new(Endpoint("prod")))).unwrap();
//! factory.register_or_replace(Some(Arc::new(Endpoint("stub")))).unwrap();
//! assert_eq!(factory.resolve::<Endpoint>().unwrap().0, "stub");
//!
//! factory.remove_service::<Endpoint>();
//! assert!(!factory.is_registered::<Endpoint>());
//!
//! factory.register_or_replace(Some(Arc::new(Endpoint("again")))).unwrap();
//! factory.clear_all();
//! assert!(factory.is_empty());
//! ```

mod activator;
mod container;
mod context;
mod error;
mod factory;
#[cfg(feature = "logging")]
pub mod logging;
mod provider;
mod registry;

pub use container::*;
pub use context::*;
pub use error::*;
pub use factory::*;
pub use provider::*;
pub use registry::Component;

#[cfg(feature = "derive")]
pub use generic_factory_derive::Autowire;

// Re-export tracing macros for convenience when logging feature is enabled
#[cfg(feature = "logging")]
pub use tracing::{debug, error, info, trace, warn};

// Re-export for convenience
pub use std::sync::Arc;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Autowire, Container, ContainerBuilder, FactoryError, GenericFactory, Injectable, Result,
        ServiceKind,
    };
    pub use std::sync::Arc;
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Store: Send + Sync {
        fn get(&self, key: &str) -> Option<String>;
    }

    struct EmptyStore;

    impl Store for EmptyStore {
        fn get(&self, _: &str) -> Option<String> {
            None
        }
    }

    struct MapStore(&'static str);

    impl Store for MapStore {
        fn get(&self, _: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    struct Cache {
        store: Arc<dyn Store>,
    }

    impl Autowire for Cache {
        fn autowire(container: &Container) -> Result<Self> {
            Ok(Cache {
                store: container.resolve::<dyn Store>()?,
            })
        }
    }

    #[test]
    fn test_substitute_then_create() {
        let mut factory = GenericFactory::new();
        let fake: Arc<dyn Store> = Arc::new(MapStore("cached"));
        factory.register_or_replace(Some(Arc::clone(&fake))).unwrap();

        let cache = factory.create_instance::<Cache>().unwrap();
        assert!(Arc::ptr_eq(&cache.store, &fake));
        assert_eq!(cache.store.get("k").as_deref(), Some("cached"));
    }

    #[test]
    fn test_swap_between_creates() {
        let mut factory = GenericFactory::new();
        factory
            .register_or_replace::<dyn Store>(Some(Arc::new(EmptyStore)))
            .unwrap();
        let before = factory.create_instance::<Cache>().unwrap();
        assert!(before.store.get("k").is_none());

        factory
            .register_or_replace::<dyn Store>(Some(Arc::new(MapStore("hit"))))
            .unwrap();
        let after = factory.create_instance::<Cache>().unwrap();
        assert_eq!(after.store.get("k").as_deref(), Some("hit"));

        // the first instance keeps what it was built with
        assert!(before.store.get("k").is_none());
    }

    #[test]
    fn test_missing_dependency_error() {
        let mut factory = GenericFactory::new();
        let err = factory.create_instance::<Cache>().err().unwrap();
        assert!(err.to_string().contains("Store"));
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let mut factory = GenericFactory::default();
        assert!(!factory.is_registered::<dyn Store>());
        assert_eq!(ServiceKind::of::<dyn Store>(), ServiceKind::Interface);
    }
}
