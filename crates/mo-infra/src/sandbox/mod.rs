//! In-memory stand-ins for the identity and registration services.
//!
//! Used for local walkthroughs. Every code dispatch issues a fresh session id
//! and the accepted code is fixed by configuration.

mod identity_verification;
mod registration_service;

pub use identity_verification::SandboxIdentityVerification;
pub use registration_service::SandboxRegistrationService;

use std::collections::HashSet;

use tokio::sync::Mutex;

/// Emails that already own an account. Shared by both sandbox services.
#[derive(Debug, Default)]
pub struct SandboxRegistry {
    emails: Mutex<HashSet<String>>,
}

impl SandboxRegistry {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: Mutex::new(emails.into_iter().map(|e| normalize(e.as_ref())).collect()),
        }
    }

    pub async fn is_registered(&self, email: &str) -> bool {
        self.emails.lock().await.contains(&normalize(email))
    }

    /// Returns `false` if the email was already registered.
    pub async fn register(&self, email: &str) -> bool {
        self.emails.lock().await.insert(normalize(email))
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
