//! Port interfaces for the application layer
//!
//! Ports define the contract between the registration use cases and the
//! services they talk to. Use cases only ever see these traits; adapters in
//! `mo-infra` (or a UI shell) implement them.

mod bank_directory;
mod category_catalog;
pub mod identity_verification;
mod registration_event;
pub mod registration_service;

pub use bank_directory::BankDirectoryPort;
pub use category_catalog::CategoryCatalogPort;
pub use identity_verification::{
    EmailAvailability, IdentityVerificationError, IdentityVerificationPort,
};
pub use registration_event::RegistrationEventPort;
pub use registration_service::{RegistrationServicePort, SubmissionError};
