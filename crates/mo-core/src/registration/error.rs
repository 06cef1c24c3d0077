use serde::Serialize;
use thiserror::Error;

use crate::registration::field::FieldErrors;

/// Failures surfaced to the user during registration.
///
/// None of these abort the workflow; each is recorded in the step state and is
/// recoverable by editing, resending or submitting again.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum RegistrationError {
    /// Local, pre-network: a field is missing or malformed.
    #[error("some fields need attention")]
    Validation(FieldErrors),

    /// The email is already registered.
    #[error("{0}")]
    Conflict(String),

    /// Verification attempted with no live session; a new code must be sent.
    #[error("verification session expired, request a new code")]
    ExpiredSession,

    /// The entered code does not match. The session stays valid.
    #[error("the code you entered is incorrect")]
    InvalidCode,

    /// The server rejected one or more fields at final submission.
    #[error("the registration was rejected, review the highlighted fields")]
    FieldValidation(FieldErrors),

    /// Any other failure, shown verbatim.
    #[error("{0}")]
    General(String),
}
