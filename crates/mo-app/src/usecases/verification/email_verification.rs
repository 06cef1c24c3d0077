//! Async driver for the email verification sub-protocol.
//!
//! The state lock is held only while reading or writing [`VerificationState`],
//! never across a call to the identity service, so a resend or reset can run
//! while an earlier send or verify is still waiting on the network. Results
//! of calls that were overtaken in the meantime come back as
//! [`VerificationError::Superseded`] and leave the state untouched.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

use mo_core::ports::{IdentityVerificationError, IdentityVerificationPort};
use mo_core::registration::validation::{is_valid_email, is_valid_verification_code};
use mo_core::verification::{
    Generation, VerificationError, VerificationSnapshot, VerificationState,
};

const DEFAULT_EMAIL_TAKEN_MESSAGE: &str = "An account with this email already exists.";

pub struct EmailVerification {
    state: Mutex<VerificationState>,
    identity: Arc<dyn IdentityVerificationPort>,
}

impl EmailVerification {
    pub fn new(identity: Arc<dyn IdentityVerificationPort>) -> Self {
        Self {
            state: Mutex::new(VerificationState::new()),
            identity,
        }
    }

    /// First dispatch: availability check, then the code.
    ///
    /// The availability check runs once per email and strictly before the
    /// code is dispatched.
    pub async fn send_code(&self, email: &str) -> Result<(), VerificationError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(VerificationError::InvalidEmail);
        }

        let span = info_span!("usecase.email_verification.send_code");
        async {
            let ticket = self.state.lock().await.begin_send(email)?;

            if ticket.check_availability {
                let availability = match self.identity.check_email_availability(email).await {
                    Ok(availability) => availability,
                    Err(err) => return self.abort_send(ticket.generation, err).await,
                };
                if !availability.available {
                    info!("email already registered");
                    self.state.lock().await.fail_send(ticket.generation)?;
                    return Err(VerificationError::EmailTaken(
                        availability
                            .message
                            .unwrap_or_else(|| DEFAULT_EMAIL_TAKEN_MESSAGE.to_string()),
                    ));
                }
                self.state.lock().await.mark_available(ticket.generation)?;
            }

            self.dispatch(email, ticket.generation).await
        }
        .instrument(span)
        .await
    }

    /// Issue a new code, invalidating the previous one and any send still in flight.
    pub async fn resend(&self, email: &str) -> Result<(), VerificationError> {
        let email = email.trim();
        let span = info_span!("usecase.email_verification.resend");
        async {
            let ticket = self.state.lock().await.begin_resend(email)?;
            self.dispatch(email, ticket.generation).await
        }
        .instrument(span)
        .await
    }

    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), VerificationError> {
        let email = email.trim();
        let code = code.trim();
        if !is_valid_verification_code(code) {
            return Err(VerificationError::InvalidCodeFormat);
        }

        let span = info_span!("usecase.email_verification.verify_code");
        async {
            let ticket = self.state.lock().await.begin_verify(email, code)?;
            let result = self
                .identity
                .verify_code(email, code, &ticket.session_id)
                .await;

            let mut state = self.state.lock().await;
            match result {
                Ok(()) => {
                    state.complete_verify(ticket.generation)?;
                    info!("email verified");
                    Ok(())
                }
                Err(IdentityVerificationError::InvalidCode) => {
                    state.reject_code(ticket.generation)?;
                    Err(VerificationError::InvalidCode)
                }
                Err(IdentityVerificationError::SessionExpired) => {
                    state.expire_session(ticket.generation)?;
                    Err(VerificationError::ExpiredSession)
                }
                Err(IdentityVerificationError::Unavailable(message)) => {
                    state.fail_verify(ticket.generation)?;
                    warn!(error = %message, "verify code failed");
                    Err(VerificationError::Service(message))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Back to idle. Every response still in flight is discarded when it lands.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.reset();
        debug!(generation = state.generation().value(), "verification reset");
    }

    pub async fn is_verified(&self) -> bool {
        self.state.lock().await.is_verified()
    }

    pub async fn snapshot(&self) -> VerificationSnapshot {
        self.state.lock().await.snapshot()
    }

    async fn dispatch(&self, email: &str, generation: Generation) -> Result<(), VerificationError> {
        match self.identity.send_verification_code(email).await {
            Ok(session_id) => {
                self.state
                    .lock()
                    .await
                    .complete_send(generation, session_id)?;
                info!(generation = generation.value(), "verification code sent");
                Ok(())
            }
            Err(err) => self.abort_send(generation, err).await,
        }
    }

    async fn abort_send(
        &self,
        generation: Generation,
        err: IdentityVerificationError,
    ) -> Result<(), VerificationError> {
        self.state.lock().await.fail_send(generation)?;
        warn!(error = %err, "verification code dispatch failed");
        Err(VerificationError::Service(err.to_string()))
    }
}
