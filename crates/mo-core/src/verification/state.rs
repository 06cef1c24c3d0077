//! Verification sub-protocol state.
//!
//! ```text
//! Idle --begin_send--> Sending --complete_send--> Sent --begin_verify--> Verifying
//!                         ^                        |                      |
//!                         +------begin_resend------+                      |
//!                                                  ^----reject_code-------+
//! Verifying --complete_verify--> Verified (terminal until reset)
//! ```
//!
//! Every send, resend and reset bumps the generation. Network results carry
//! the generation of the call that issued them and are dropped when it no
//! longer matches, so a late response can never overwrite a newer session.

#[cfg(feature = "tracing")]
use tracing::debug;

use serde::Serialize;

use crate::ids::VerificationSessionId;
use crate::verification::error::VerificationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerificationPhase {
    Idle,
    Sending,
    Sent,
    Verifying,
    Verified,
}

/// Monotonic counter identifying the send attempt a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issued by `begin_send` / `begin_resend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendTicket {
    pub generation: Generation,
    /// Availability has not been confirmed for this email yet.
    pub check_availability: bool,
}

/// Issued by `begin_verify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyTicket {
    pub generation: Generation,
    pub session_id: VerificationSessionId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationState {
    email: Option<String>,
    session_id: Option<VerificationSessionId>,
    last_code: Option<String>,
    phase: VerificationPhase,
    sending: bool,
    /// The dispatch in flight is a resend; a second one is refused.
    resending: bool,
    verifying: bool,
    generation: Generation,
    availability_checked: bool,
}

impl Default for VerificationState {
    fn default() -> Self {
        Self {
            email: None,
            session_id: None,
            last_code: None,
            phase: VerificationPhase::Idle,
            sending: false,
            resending: false,
            verifying: false,
            generation: Generation(0),
            availability_checked: false,
        }
    }
}

impl VerificationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> VerificationPhase {
        self.phase
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn session_id(&self) -> Option<&VerificationSessionId> {
        self.session_id.as_ref()
    }

    pub fn last_code(&self) -> Option<&str> {
        self.last_code.as_deref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn is_verifying(&self) -> bool {
        self.verifying
    }

    pub fn is_verified(&self) -> bool {
        self.phase == VerificationPhase::Verified
    }

    /// First dispatch for `email`. Only valid from `Idle`.
    pub fn begin_send(&mut self, email: &str) -> Result<SendTicket, VerificationError> {
        if self.is_verified() {
            return Err(VerificationError::AlreadyVerified);
        }
        if self.sending {
            return Err(VerificationError::SendInFlight);
        }
        if self.phase != VerificationPhase::Idle {
            return Err(VerificationError::AlreadySent);
        }

        let same_email = self.email.as_deref() == Some(email);
        let check_availability = !(same_email && self.availability_checked);
        if !same_email {
            self.availability_checked = false;
        }
        self.email = Some(email.to_string());
        Ok(self.start_dispatch(check_availability))
    }

    /// New code for the email already under verification. Discards the
    /// current session and code, and overtakes a first send still in flight.
    /// Only one resend may be in flight at a time.
    pub fn begin_resend(&mut self, email: &str) -> Result<SendTicket, VerificationError> {
        if self.is_verified() {
            return Err(VerificationError::AlreadyVerified);
        }
        match self.email.as_deref() {
            Some(current) if self.availability_checked => {
                if current != email {
                    return Err(VerificationError::EmailChanged);
                }
            }
            _ => return Err(VerificationError::NothingToResend),
        }
        if self.sending && self.resending {
            return Err(VerificationError::SendInFlight);
        }
        let ticket = self.start_dispatch(false);
        self.resending = true;
        Ok(ticket)
    }

    fn start_dispatch(&mut self, check_availability: bool) -> SendTicket {
        self.generation = Generation(self.generation.0 + 1);
        self.session_id = None;
        self.last_code = None;
        self.sending = true;
        self.resending = false;
        self.verifying = false;
        self.phase = VerificationPhase::Sending;
        #[cfg(feature = "tracing")]
        debug!(
            generation = self.generation.0,
            check_availability,
            "verification dispatch started"
        );
        SendTicket {
            generation: self.generation,
            check_availability,
        }
    }

    /// Record that the availability check passed for the current email.
    pub fn mark_available(&mut self, generation: Generation) -> Result<(), VerificationError> {
        self.ensure_current(generation)?;
        self.availability_checked = true;
        Ok(())
    }

    pub fn complete_send(
        &mut self,
        generation: Generation,
        session_id: VerificationSessionId,
    ) -> Result<(), VerificationError> {
        self.ensure_current(generation)?;
        self.session_id = Some(session_id);
        self.sending = false;
        self.resending = false;
        self.phase = VerificationPhase::Sent;
        Ok(())
    }

    /// The dispatch failed (taken email, service error). No session survives.
    pub fn fail_send(&mut self, generation: Generation) -> Result<(), VerificationError> {
        self.ensure_current(generation)?;
        self.sending = false;
        self.resending = false;
        self.phase = VerificationPhase::Idle;
        Ok(())
    }

    pub fn begin_verify(
        &mut self,
        email: &str,
        code: &str,
    ) -> Result<VerifyTicket, VerificationError> {
        if self.is_verified() {
            return Err(VerificationError::AlreadyVerified);
        }
        if self.verifying {
            return Err(VerificationError::VerifyInFlight);
        }
        if let Some(current) = self.email.as_deref() {
            if current != email {
                return Err(VerificationError::EmailChanged);
            }
        }
        let session_id = self
            .session_id
            .clone()
            .ok_or(VerificationError::ExpiredSession)?;

        self.last_code = Some(code.to_string());
        self.verifying = true;
        self.phase = VerificationPhase::Verifying;
        Ok(VerifyTicket {
            generation: self.generation,
            session_id,
        })
    }

    pub fn complete_verify(&mut self, generation: Generation) -> Result<(), VerificationError> {
        self.ensure_current(generation)?;
        self.verifying = false;
        self.phase = VerificationPhase::Verified;
        Ok(())
    }

    /// Wrong code. The session stays valid for another attempt.
    pub fn reject_code(&mut self, generation: Generation) -> Result<(), VerificationError> {
        self.ensure_current(generation)?;
        self.verifying = false;
        self.phase = VerificationPhase::Sent;
        Ok(())
    }

    /// The service no longer knows the session. A resend is required.
    pub fn expire_session(&mut self, generation: Generation) -> Result<(), VerificationError> {
        self.ensure_current(generation)?;
        self.session_id = None;
        self.verifying = false;
        self.phase = VerificationPhase::Idle;
        Ok(())
    }

    /// Verification call failed for reasons unrelated to the code.
    pub fn fail_verify(&mut self, generation: Generation) -> Result<(), VerificationError> {
        self.ensure_current(generation)?;
        self.verifying = false;
        self.phase = VerificationPhase::Sent;
        Ok(())
    }

    /// Back to `Idle`. Everything in flight becomes stale.
    pub fn reset(&mut self) {
        let generation = Generation(self.generation.0 + 1);
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    pub fn snapshot(&self) -> VerificationSnapshot {
        VerificationSnapshot {
            phase: self.phase,
            email: self.email.clone(),
            has_session: self.session_id.is_some(),
            sending: self.sending,
            verifying: self.verifying,
        }
    }

    fn ensure_current(&self, generation: Generation) -> Result<(), VerificationError> {
        if generation == self.generation {
            Ok(())
        } else {
            #[cfg(feature = "tracing")]
            debug!(
                stale = generation.0,
                current = self.generation.0,
                "discarding stale verification result"
            );
            Err(VerificationError::Superseded)
        }
    }
}

/// What a UI needs to render the verification step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationSnapshot {
    pub phase: VerificationPhase,
    pub email: Option<String>,
    pub has_session: bool,
    pub sending: bool,
    pub verifying: bool,
}
