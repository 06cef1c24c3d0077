//! Maps server-rejected fields back to the step that collects them.

use crate::registration::field::{DraftField, FieldErrors};
use crate::registration::step::RegistrationStep;

/// The step that owns `field`.
///
/// Unrecognized fields go to the last step, which holds the least structured data.
pub fn owning_step(field: &DraftField) -> RegistrationStep {
    match field {
        DraftField::Email | DraftField::Password | DraftField::ConfirmPassword => {
            RegistrationStep::Credentials
        }
        DraftField::VerificationCode => RegistrationStep::EmailVerification,
        DraftField::FullName
        | DraftField::BusinessName
        | DraftField::BusinessCategory
        | DraftField::PhoneNumber
        | DraftField::AccountNumber
        | DraftField::BankName => RegistrationStep::BusinessProfile,
        DraftField::StoreName
        | DraftField::BusinessAddress
        | DraftField::TaxId
        | DraftField::RegistrationNumber
        | DraftField::IdentityDocument
        | DraftField::RegistrationCertificate
        | DraftField::Unrecognized(_) => RegistrationStep::BusinessDetails,
    }
}

/// Earliest step holding any of `errors`, so fixes happen in workflow order.
///
/// `None` when there is nothing to rewind for.
pub fn attribute(errors: &FieldErrors) -> Option<RegistrationStep> {
    errors.fields().map(owning_step).min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_error_set_does_not_rewind() {
        assert_eq!(attribute(&FieldErrors::new()), None);
    }

    #[test]
    fn rewinds_to_minimum_owning_step() {
        let errors = FieldErrors::from_wire([
            ("storeName", "taken"),
            ("accountNumber", "not found at bank"),
        ]);
        assert_eq!(attribute(&errors), Some(RegistrationStep::BusinessProfile));
    }

    #[test]
    fn email_conflict_rewinds_to_first_step() {
        let errors = FieldErrors::from_wire([
            ("taxId", "invalid"),
            ("email", "already registered"),
        ]);
        assert_eq!(attribute(&errors), Some(RegistrationStep::Credentials));
    }

    #[test]
    fn unrecognized_field_goes_to_last_step() {
        let errors = FieldErrors::from_wire([("merchantTier", "unsupported")]);
        assert_eq!(attribute(&errors), Some(RegistrationStep::BusinessDetails));
    }

    #[test]
    fn every_step_owns_at_least_one_known_field() {
        let fields = [
            DraftField::Email,
            DraftField::VerificationCode,
            DraftField::AccountNumber,
            DraftField::TaxId,
        ];
        let owners: Vec<RegistrationStep> = fields.iter().map(owning_step).collect();
        assert_eq!(owners, RegistrationStep::ALL.to_vec());
    }
}
