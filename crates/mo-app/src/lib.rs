//! Merchant Onboarding Application Layer
//!
//! Use cases driving the registration workflow against the ports declared in
//! `mo-core`.

pub mod usecases;

pub use usecases::registration::{ControllerError, RegistrationController, RegistrationDeps};
pub use usecases::verification::EmailVerification;
