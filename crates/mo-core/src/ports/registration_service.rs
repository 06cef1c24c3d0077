//! Registration service port - the single account-creation call

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::ids::AccountId;
use crate::registration::RegistrationSubmission;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Backend field name to message, as reported by the service.
    #[error("registration rejected for {} field(s)", .0.len())]
    FieldValidation(HashMap<String, String>),

    #[error("{0}")]
    General(String),
}

#[async_trait]
pub trait RegistrationServicePort: Send + Sync {
    /// Create the merchant account. Not idempotent; called at most once per
    /// confirmed submission.
    async fn submit_registration(
        &self,
        submission: &RegistrationSubmission,
    ) -> Result<AccountId, SubmissionError>;
}
