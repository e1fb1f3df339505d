//! Framework services every built container registers about itself
//!
//! [`LifetimeScope`] and [`ComponentContext`] describe the container that
//! created them. They are valid only inside that container, so they are
//! never copied into a rebuilt one.

use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique container identifier.
///
/// Each built container gets a unique ID for tracking and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope(u64);

impl Scope {
    /// Generate a new unique scope ID.
    #[inline]
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scope-{}", self.0)
    }
}

/// The container currently resolving, as seen by the services it builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifetimeScope {
    scope: Scope,
}

impl LifetimeScope {
    #[inline]
    pub(crate) fn new(scope: Scope) -> Self {
        Self { scope }
    }

    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }
}

/// Snapshot of what the originating container could resolve when it was built.
#[derive(Debug, Clone)]
pub struct ComponentContext {
    scope: Scope,
    services: Vec<&'static str>,
}

impl ComponentContext {
    #[inline]
    pub(crate) fn new(scope: Scope, services: Vec<&'static str>) -> Self {
        Self { scope, services }
    }

    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Type names of the user services registered in the container
    #[inline]
    pub fn services(&self) -> &[&'static str] {
        &self.services
    }
}

/// Whether `type_id` is one of the per-container framework services
#[inline]
pub fn is_framework_service(type_id: TypeId) -> bool {
    type_id == TypeId::of::<LifetimeScope>() || type_id == TypeId::of::<ComponentContext>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_ids_unique() {
        let a = Scope::new();
        let b = Scope::new();
        assert_ne!(a, b);
        assert!(b.id() > a.id());
        assert_eq!(a.to_string(), format!("scope-{}", a.id()));
    }

    #[test]
    fn test_framework_services() {
        assert!(is_framework_service(TypeId::of::<LifetimeScope>()));
        assert!(is_framework_service(TypeId::of::<ComponentContext>()));
        assert!(!is_framework_service(TypeId::of::<Scope>()));
    }

    #[test]
    fn test_component_context_snapshot() {
        let scope = Scope::new();
        let ctx = ComponentContext::new(scope, vec!["app::Mailer"]);
        assert_eq!(ctx.scope(), scope);
        assert_eq!(ctx.services(), &["app::Mailer"]);
        assert_eq!(LifetimeScope::new(scope).scope(), scope);
    }
}
