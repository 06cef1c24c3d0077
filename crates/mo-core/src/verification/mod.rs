//! Email ownership verification domain.
//!
//! Holds the one-time-code sub-protocol state. All mutation goes through the
//! guarded methods on [`VerificationState`]; the async driver lives in `mo-app`.

pub mod error;
pub mod state;

pub use error::VerificationError;
pub use state::{
    Generation, SendTicket, VerificationPhase, VerificationSnapshot, VerificationState,
    VerifyTicket,
};
