//! `#[derive(Autowire)]` against a live factory

use generic_factory::{Autowire, FactoryError, GenericFactory};
use std::sync::Arc;

trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct FrozenClock(u64);

impl Clock for FrozenClock {
    fn now(&self) -> u64 {
        self.0
    }
}

struct Settings {
    region: &'static str,
}

#[derive(Autowire)]
struct Billing {
    #[inject]
    clock: Arc<dyn Clock>,
    #[inject(optional)]
    settings: Option<Arc<Settings>>,
    invoices_sent: u64,
}

#[derive(Autowire)]
struct Checkout {
    #[inject]
    billing: Arc<Billing>,
}

#[derive(Autowire)]
struct Marker;

#[test]
fn test_required_and_default_fields() {
    let mut factory = GenericFactory::new();
    let clock: Arc<dyn Clock> = Arc::new(FrozenClock(7));
    factory.register_or_replace(Some(Arc::clone(&clock))).unwrap();

    let billing = factory.create_instance::<Billing>().unwrap();
    assert!(Arc::ptr_eq(&billing.clock, &clock));
    assert_eq!(billing.clock.now(), 7);
    assert!(billing.settings.is_none());
    assert_eq!(billing.invoices_sent, 0);
}

#[test]
fn test_optional_field_resolved_when_registered() {
    let mut factory = GenericFactory::new();
    factory
        .register_or_replace::<dyn Clock>(Some(Arc::new(FrozenClock(1))))
        .unwrap();
    factory
        .register_or_replace(Some(Arc::new(Settings { region: "eu" })))
        .unwrap();

    let billing = factory.create_instance::<Billing>().unwrap();
    assert_eq!(billing.settings.as_ref().map(|s| s.region), Some("eu"));
}

#[test]
fn test_missing_required_field() {
    let mut factory = GenericFactory::new();
    let err = factory.create_instance::<Billing>().err().unwrap();
    assert!(matches!(err, FactoryError::NotFound { .. }));
}

#[test]
fn test_nested_autowiring_reuses_created_instance() {
    let mut factory = GenericFactory::new();
    factory
        .register_or_replace::<dyn Clock>(Some(Arc::new(FrozenClock(3))))
        .unwrap();

    let billing = factory.create_instance::<Billing>().unwrap();
    let checkout = factory.create_instance::<Checkout>().unwrap();

    // Billing was frozen to its first instance when Checkout was added
    assert!(Arc::ptr_eq(&checkout.billing, &billing));
}

#[test]
fn test_unit_struct() {
    let mut factory = GenericFactory::new();
    factory.create_instance::<Marker>().unwrap();
    assert!(factory.is_registered::<Marker>());
}
