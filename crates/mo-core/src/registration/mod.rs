//! Registration domain module.
//!
//! Draft record, step model, validation rules, error attribution and the
//! workflow state machine.

pub mod attribution;
pub mod directory;
pub mod draft;
pub mod error;
pub mod field;
pub mod state_machine;
pub mod snapshot;
pub mod step;
pub mod submission;
pub mod validation;

pub use directory::{BankEntry, BusinessCategory, CategoryCatalog};
pub use draft::{DocumentAttachment, DraftEdit, DraftSnapshot, RegistrationDraft};
pub use error::RegistrationError;
pub use field::{DraftField, FieldErrors};
pub use state_machine::{RegistrationAction, RegistrationEvent, RegistrationStateMachine};
pub use snapshot::{ConfirmationGate, RegistrationSnapshot};
pub use step::{RegistrationStage, RegistrationStep, StepState};
pub use submission::RegistrationSubmission;
