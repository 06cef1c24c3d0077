//! Identity verification port - email availability and one-time codes

use async_trait::async_trait;
use thiserror::Error;

use crate::ids::VerificationSessionId;

/// Result of the availability lookup that precedes the first code dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAvailability {
    pub available: bool,
    /// Service-provided explanation when the email is taken.
    pub message: Option<String>,
}

impl EmailAvailability {
    pub fn available() -> Self {
        Self {
            available: true,
            message: None,
        }
    }

    pub fn taken(message: impl Into<String>) -> Self {
        Self {
            available: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityVerificationError {
    #[error("verification code rejected")]
    InvalidCode,

    #[error("verification session expired")]
    SessionExpired,

    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityVerificationPort: Send + Sync {
    async fn check_email_availability(
        &self,
        email: &str,
    ) -> Result<EmailAvailability, IdentityVerificationError>;

    /// Dispatch a fresh code. Any earlier session for the email is abandoned.
    async fn send_verification_code(
        &self,
        email: &str,
    ) -> Result<VerificationSessionId, IdentityVerificationError>;

    async fn verify_code(
        &self,
        email: &str,
        code: &str,
        session_id: &VerificationSessionId,
    ) -> Result<(), IdentityVerificationError>;
}

#[cfg(test)]
mockall::mock! {
    pub IdentityVerification {}

    #[async_trait]
    impl IdentityVerificationPort for IdentityVerification {
        async fn check_email_availability(
            &self,
            email: &str,
        ) -> Result<EmailAvailability, IdentityVerificationError>;
        async fn send_verification_code(
            &self,
            email: &str,
        ) -> Result<VerificationSessionId, IdentityVerificationError>;
        async fn verify_code(
            &self,
            email: &str,
            code: &str,
            session_id: &VerificationSessionId,
        ) -> Result<(), IdentityVerificationError>;
    }
}
