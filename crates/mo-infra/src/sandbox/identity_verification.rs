use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mo_core::ids::VerificationSessionId;
use mo_core::ports::{EmailAvailability, IdentityVerificationError, IdentityVerificationPort};
use tokio::sync::Mutex;
use tracing::info;

use super::{normalize, SandboxRegistry};

const EMAIL_TAKEN_MESSAGE: &str = "An account with this email already exists.";

pub struct SandboxIdentityVerification {
    accepted_code: String,
    registry: Arc<SandboxRegistry>,
    /// Latest session per email. Older sessions are expired by a new dispatch.
    sessions: Mutex<HashMap<String, VerificationSessionId>>,
}

impl SandboxIdentityVerification {
    pub fn new(accepted_code: impl Into<String>, registry: Arc<SandboxRegistry>) -> Self {
        Self {
            accepted_code: accepted_code.into(),
            registry,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl IdentityVerificationPort for SandboxIdentityVerification {
    async fn check_email_availability(
        &self,
        email: &str,
    ) -> Result<EmailAvailability, IdentityVerificationError> {
        if self.registry.is_registered(email).await {
            Ok(EmailAvailability::taken(EMAIL_TAKEN_MESSAGE))
        } else {
            Ok(EmailAvailability::available())
        }
    }

    async fn send_verification_code(
        &self,
        email: &str,
    ) -> Result<VerificationSessionId, IdentityVerificationError> {
        let session_id = VerificationSessionId::new();
        self.sessions
            .lock()
            .await
            .insert(normalize(email), session_id.clone());
        info!(session_id = %session_id, "sandbox verification code issued");
        Ok(session_id)
    }

    async fn verify_code(
        &self,
        email: &str,
        code: &str,
        session_id: &VerificationSessionId,
    ) -> Result<(), IdentityVerificationError> {
        let sessions = self.sessions.lock().await;
        if sessions.get(&normalize(email)) != Some(session_id) {
            return Err(IdentityVerificationError::SessionExpired);
        }
        if code != self.accepted_code {
            return Err(IdentityVerificationError::InvalidCode);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox(registered: &[&str]) -> SandboxIdentityVerification {
        SandboxIdentityVerification::new("13579", Arc::new(SandboxRegistry::new(registered)))
    }

    #[tokio::test]
    async fn registered_email_is_reported_taken() {
        let identity = sandbox(&["Taken@Shop.ng"]);

        let availability = identity
            .check_email_availability("taken@shop.ng")
            .await
            .unwrap();

        assert!(!availability.available);
        assert_eq!(availability.message.as_deref(), Some(EMAIL_TAKEN_MESSAGE));
    }

    #[tokio::test]
    async fn new_dispatch_expires_previous_session() {
        let identity = sandbox(&[]);
        let first = identity.send_verification_code("a@b.ng").await.unwrap();
        let second = identity.send_verification_code("a@b.ng").await.unwrap();
        assert_ne!(first, second);

        assert_eq!(
            identity.verify_code("a@b.ng", "13579", &first).await,
            Err(IdentityVerificationError::SessionExpired)
        );
        assert_eq!(identity.verify_code("a@b.ng", "13579", &second).await, Ok(()));
    }

    #[tokio::test]
    async fn wrong_code_is_rejected() {
        let identity = sandbox(&[]);
        let session = identity.send_verification_code("a@b.ng").await.unwrap();

        assert_eq!(
            identity.verify_code("a@b.ng", "00000", &session).await,
            Err(IdentityVerificationError::InvalidCode)
        );
    }
}
