//! Identifier newtypes shared across the onboarding domain.

mod id_macro;

use serde::{Deserialize, Serialize};

use id_macro::impl_id;

/// Opaque identifier correlating a dispatched one-time code with its verification attempt.
///
/// Issued by the identity verification service; never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationSessionId(String);

/// Identifier of the merchant account created by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl_id!(VerificationSessionId, AccountId);

/// Numeric business category id, as published by the category catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_round_trips_through_string() {
        let id = VerificationSessionId::from("vs-123");
        assert_eq!(id.as_ref(), "vs-123");
        assert_eq!(id.to_string(), "vs-123");
        assert_eq!(id.into_inner(), "vs-123".to_string());
    }

    #[test]
    fn generated_account_ids_are_unique() {
        assert_ne!(AccountId::new(), AccountId::new());
    }
}
