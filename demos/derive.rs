//! Example demonstrating #[derive(Autowire)] with service substitution
//!
//! Run with:
//!   cargo run --example derive --features derive

use generic_factory::{Autowire, GenericFactory};
use std::sync::Arc;

trait PaymentGateway: Send + Sync {
    fn charge(&self, cents: u64) -> Result<String, String>;
}

struct DeclineEverything;

impl PaymentGateway for DeclineEverything {
    fn charge(&self, cents: u64) -> Result<String, String> {
        Err(format!("declined {cents} cents"))
    }
}

struct AcceptEverything;

impl PaymentGateway for AcceptEverything {
    fn charge(&self, cents: u64) -> Result<String, String> {
        Ok(format!("txn-{cents}"))
    }
}

#[allow(dead_code)]
struct Logger {
    prefix: String,
}

#[derive(Autowire)]
struct CheckoutService {
    #[inject]
    gateway: Arc<dyn PaymentGateway>,
    #[inject(optional)]
    logger: Option<Arc<Logger>>,
    // Non-injected field uses Default
    attempts: u32,
}

impl CheckoutService {
    fn pay(&self, cents: u64) -> String {
        let outcome = match self.gateway.charge(cents) {
            Ok(id) => format!("paid ({id})"),
            Err(reason) => format!("failed ({reason})"),
        };
        let logging = if self.logger.is_some() {
            "with logging"
        } else {
            "without logging"
        };
        format!("{outcome}, {logging}, attempts: {}", self.attempts)
    }
}

fn main() {
    #[cfg(feature = "logging-pretty")]
    generic_factory::logging::init_pretty();

    println!("=== Generic Factory Derive Demo ===\n");

    let mut factory = GenericFactory::new();

    // Substitute a gateway that declines every charge
    factory
        .register_or_replace::<dyn PaymentGateway>(Some(Arc::new(DeclineEverything)))
        .expect("gateway instance");

    let checkout = factory
        .create_instance::<CheckoutService>()
        .expect("Failed to create CheckoutService");
    println!("Declining gateway: {}", checkout.pay(1999));

    // Swap in an accepting gateway and a logger, then build a new service
    factory
        .register_or_replace::<dyn PaymentGateway>(Some(Arc::new(AcceptEverything)))
        .expect("gateway instance");
    factory
        .register_or_replace(Some(Arc::new(Logger {
            prefix: "[checkout]".into(),
        })))
        .expect("logger instance");

    let checkout = factory
        .create_instance::<CheckoutService>()
        .expect("Failed to create CheckoutService");
    println!("Accepting gateway: {}", checkout.pay(1999));

    // Remove the logger again
    factory.remove_service::<Logger>();
    println!("Logger registered after removal: {}", factory.is_registered::<Logger>());

    factory.clear_all();
    println!("Registrations after clear: {}", factory.len());

    println!("\n=== Demo Complete ===");
}
