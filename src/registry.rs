//! Component registry shared by the builder and the built container
//!
//! Components keep registration order for enumeration and are indexed by
//! the `TypeId` of the service they provide.

use crate::activator::Activator;
use crate::provider::{ServiceKey, ServiceKind};
use ahash::RandomState;
use std::any::TypeId;
use std::collections::HashMap;

/// A single registration: what is requested, what implements it, and how
/// instances are produced.
pub struct Component {
    service: ServiceKey,
    limit: ServiceKey,
    kind: ServiceKind,
    pub(crate) activator: Activator,
    internal: bool,
}

impl Component {
    #[inline]
    pub(crate) fn new(
        service: ServiceKey,
        limit: ServiceKey,
        kind: ServiceKind,
        activator: Activator,
    ) -> Self {
        Self {
            service,
            limit,
            kind,
            activator,
            internal: false,
        }
    }

    /// A framework service only valid inside the container that created it
    #[inline]
    pub(crate) fn internal(service: ServiceKey, activator: Activator) -> Self {
        Self {
            service,
            limit: service,
            kind: ServiceKind::Concrete,
            activator,
            internal: true,
        }
    }

    /// The requested type this component answers for
    #[inline]
    pub fn service(&self) -> ServiceKey {
        self.service
    }

    /// The implementation type behind the service
    #[inline]
    pub fn limit_type(&self) -> ServiceKey {
        self.limit
    }

    #[inline]
    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// Whether this is one of the container's own services
    #[inline]
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    /// Whether resolving this component returns a fixed instance
    #[inline]
    pub fn is_provided_instance(&self) -> bool {
        self.activator.is_provided()
    }

    /// Copy of this component for a new container, with its state frozen
    pub(crate) fn frozen(&self) -> Component {
        Component {
            service: self.service,
            limit: self.limit,
            kind: self.kind,
            activator: self.activator.freeze(),
            internal: self.internal,
        }
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("service", &self.service.type_name)
            .field("limit_type", &self.limit.type_name)
            .field("kind", &self.kind)
            .field("provided", &self.is_provided_instance())
            .field("internal", &self.internal)
            .finish()
    }
}

/// Ordered, `TypeId`-indexed component storage
#[derive(Default)]
pub(crate) struct ComponentRegistry {
    components: Vec<Component>,
    index: HashMap<TypeId, usize, RandomState>,
}

impl ComponentRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a component, replacing any earlier one for the same service.
    ///
    /// A replaced component keeps its position in registration order.
    pub fn insert(&mut self, component: Component) {
        let type_id = component.service.type_id;
        match self.index.get(&type_id) {
            Some(&slot) => self.components[slot] = component,
            None => {
                self.index.insert(type_id, self.components.len());
                self.components.push(component);
            }
        }
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&Component> {
        self.index.get(type_id).map(|&slot| &self.components[slot])
    }

    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.index.contains_key(type_id)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    /// Consume the registry, yielding components in registration order
    #[inline]
    pub fn into_components(self) -> Vec<Component> {
        self.components
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Mailer {
        host: &'static str,
    }

    struct Queue;

    fn provided<T: Send + Sync + 'static>(value: T) -> Component {
        Component::new(
            ServiceKey::of::<T>(),
            ServiceKey::of::<T>(),
            ServiceKind::Concrete,
            Activator::provided(Arc::new(value)),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let mut registry = ComponentRegistry::new();
        registry.insert(provided(Mailer { host: "smtp" }));

        let component = registry.get(&TypeId::of::<Mailer>()).unwrap();
        assert_eq!(component.service(), ServiceKey::of::<Mailer>());
        assert!(component.is_provided_instance());
        assert!(!component.is_internal());
        assert!(registry.contains(&TypeId::of::<Mailer>()));
        assert!(!registry.contains(&TypeId::of::<Queue>()));
    }

    #[test]
    fn test_replace_keeps_order_and_len() {
        let mut registry = ComponentRegistry::new();
        registry.insert(provided(Mailer { host: "first" }));
        registry.insert(provided(Queue));
        registry.insert(provided(Mailer { host: "second" }));

        assert_eq!(registry.len(), 2);
        let order: Vec<_> = registry.iter().map(|c| c.service().type_id).collect();
        assert_eq!(order, vec![TypeId::of::<Mailer>(), TypeId::of::<Queue>()]);

        let container = crate::ContainerBuilder::new().build();
        let erased = registry
            .get(&TypeId::of::<Mailer>())
            .unwrap()
            .activator
            .activate(&container)
            .unwrap();
        let mailer = crate::activator::unerase::<Mailer>(&erased).unwrap();
        assert_eq!(mailer.host, "second");
    }

    #[test]
    fn test_empty() {
        let registry = ComponentRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(&TypeId::of::<Queue>()).is_none());
    }
}
