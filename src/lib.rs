//! Merchant onboarding: bootstrap and wiring for the registration workflow.

pub mod bootstrap;

pub use bootstrap::{init_tracing_subscriber, load_config, wire_sandbox_controller};
