use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("enter a valid email address")]
    InvalidEmail,

    #[error("enter the 5-digit code sent to your email")]
    InvalidCodeFormat,

    #[error("{0}")]
    EmailTaken(String),

    #[error("verification session expired, request a new code")]
    ExpiredSession,

    #[error("the code you entered is incorrect")]
    InvalidCode,

    #[error("email is already verified")]
    AlreadyVerified,

    #[error("a code was already sent, use resend instead")]
    AlreadySent,

    #[error("a code is already being sent")]
    SendInFlight,

    #[error("a code is already being verified")]
    VerifyInFlight,

    #[error("no code has been sent yet")]
    NothingToResend,

    #[error("email changed since the code was sent")]
    EmailChanged,

    /// A newer send, resend or reset overtook this call; its result was dropped.
    #[error("superseded by a newer request")]
    Superseded,

    #[error("verification service unavailable: {0}")]
    Service(String),
}
