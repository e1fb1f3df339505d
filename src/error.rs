//! Error types for the factory and its container

use std::any::TypeId;
use thiserror::Error;

/// Errors that can occur while registering or resolving services
#[derive(Error, Debug, Clone)]
pub enum FactoryError {
    /// Service was not registered in the container
    #[error("Service not registered: {type_name}")]
    NotFound {
        type_name: &'static str,
        type_id: TypeId,
    },

    /// A type was requested again while it was still being autowired
    #[error("Circular dependency detected while resolving: {type_name}")]
    CircularDependency { type_name: &'static str },

    /// An `Autowire` implementation failed to construct the service
    #[error("Failed to create service {type_name}: {reason}")]
    CreationFailed {
        type_name: &'static str,
        reason: String,
    },

    /// A required argument was absent
    #[error("Invalid argument: {param} must not be None")]
    InvalidArgument { param: &'static str },

    /// Internal error
    #[error("Internal factory error: {0}")]
    Internal(String),
}

impl FactoryError {
    /// Create a NotFound error for a type
    #[inline]
    pub fn not_found<T: ?Sized + 'static>() -> Self {
        Self::NotFound {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Create a CreationFailed error
    #[inline]
    pub fn creation_failed<T: ?Sized + 'static>(reason: impl Into<String>) -> Self {
        Self::CreationFailed {
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }

    /// Create a CircularDependency error
    #[inline]
    pub fn circular<T: ?Sized + 'static>() -> Self {
        Self::CircularDependency {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Create an InvalidArgument error for the named parameter
    #[inline]
    pub fn invalid_argument(param: &'static str) -> Self {
        Self::InvalidArgument { param }
    }
}

/// Result type alias for factory operations
pub type Result<T> = std::result::Result<T, FactoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn test_not_found_names_type() {
        let err = FactoryError::not_found::<Widget>();
        assert!(err.to_string().contains("Widget"));
        match err {
            FactoryError::NotFound { type_id, .. } => assert_eq!(type_id, TypeId::of::<Widget>()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_not_found_for_trait_object() {
        trait Greeter {}
        let err = FactoryError::not_found::<dyn Greeter>();
        assert!(err.to_string().contains("Greeter"));
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = FactoryError::invalid_argument("service");
        assert_eq!(err.to_string(), "Invalid argument: service must not be None");
    }

    #[test]
    fn test_clone_preserves_variant() {
        let err = FactoryError::creation_failed::<Widget>("disk full");
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
