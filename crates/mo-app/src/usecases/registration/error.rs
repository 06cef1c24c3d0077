use mo_core::registration::{DraftField, RegistrationStage, RegistrationStep};
use mo_core::verification::VerificationError;

/// Misuse of the controller.
///
/// Failures the user can act on (validation, conflicts, wrong codes, rejected
/// submissions) are not errors here; they are recorded in the session state.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("{operation} is not available while {stage:?}")]
    NotAllowed {
        operation: &'static str,
        stage: RegistrationStage,
    },

    #[error("{field} is not editable on {step}")]
    FieldNotEditable {
        field: DraftField,
        step: RegistrationStep,
    },

    #[error("bank code {0} was not returned by a bank search in this session")]
    UnknownBank(String),

    #[error("verification request refused: {0}")]
    Verification(#[source] VerificationError),
}
