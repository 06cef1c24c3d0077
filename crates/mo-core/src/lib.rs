//! # mo-core
//!
//! Core domain models and business rules for merchant onboarding.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod config;
pub mod ids;
pub mod ports;
pub mod registration;
pub mod security;
pub mod verification;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use ids::{AccountId, CategoryId, VerificationSessionId};
pub use registration::{
    DraftField, FieldErrors, RegistrationDraft, RegistrationError, RegistrationStage,
    RegistrationStep,
};
pub use security::SecretString;
pub use verification::{VerificationError, VerificationPhase, VerificationState};
