use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mo_core::ids::AccountId;
use mo_core::ports::{RegistrationServicePort, SubmissionError};
use mo_core::registration::{DraftField, RegistrationSubmission};
use tracing::info;

use super::SandboxRegistry;

/// Accepts every submission whose email is not registered yet.
pub struct SandboxRegistrationService {
    registry: Arc<SandboxRegistry>,
}

impl SandboxRegistrationService {
    pub fn new(registry: Arc<SandboxRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl RegistrationServicePort for SandboxRegistrationService {
    async fn submit_registration(
        &self,
        submission: &RegistrationSubmission,
    ) -> Result<AccountId, SubmissionError> {
        if !self.registry.register(&submission.email).await {
            return Err(SubmissionError::FieldValidation(HashMap::from([(
                DraftField::Email.as_wire().to_string(),
                "An account with this email already exists.".to_string(),
            )])));
        }

        let account_id = AccountId::new();
        info!(
            account_id = %account_id,
            bank_code = %submission.bank_code,
            "sandbox account created"
        );
        Ok(account_id)
    }
}
