//! Serializable views of the whole registration session, for UI rendering.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::registration::draft::{DraftSnapshot, RegistrationDraft};
use crate::registration::error::RegistrationError;
use crate::registration::field::FieldErrors;
use crate::registration::step::{RegistrationStage, RegistrationStep, StepState};
use crate::registration::validation::account_number_progress;
use crate::verification::VerificationSnapshot;

pub const IMMUTABLE_SETTLEMENT_WARNING: &str =
    "Your settlement account number and bank cannot be changed after registration. Confirm they are correct before you continue.";

/// Content of the modal shown before the irreversible submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationGate {
    /// Exactly as entered; never reformatted or masked.
    pub account_number: String,
    pub bank_name: String,
    pub warning: &'static str,
}

impl ConfirmationGate {
    pub fn for_draft(draft: &RegistrationDraft) -> Self {
        Self {
            account_number: draft.profile().account_number().to_string(),
            bank_name: draft.profile().bank().name.clone(),
            warning: IMMUTABLE_SETTLEMENT_WARNING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationSnapshot {
    pub stage: RegistrationStage,
    pub current_step: Option<RegistrationStep>,
    pub completed: BTreeSet<RegistrationStep>,
    pub errors: FieldErrors,
    pub last_error: Option<RegistrationError>,
    /// `None` once the draft has been discarded after submission.
    pub draft: Option<DraftSnapshot>,
    /// Inline progress hint while the account number is partially typed.
    pub account_number_hint: Option<String>,
    pub verification: VerificationSnapshot,
    /// Present while the confirmation gate is open or the submission is in flight.
    pub gate: Option<ConfirmationGate>,
}

impl RegistrationSnapshot {
    pub fn capture(
        steps: &StepState,
        draft: Option<&RegistrationDraft>,
        verification: VerificationSnapshot,
    ) -> Self {
        let gate = match steps.stage() {
            RegistrationStage::Confirming | RegistrationStage::Submitting => {
                draft.map(ConfirmationGate::for_draft)
            }
            _ => None,
        };
        Self {
            stage: steps.stage().clone(),
            current_step: steps.current_step(),
            completed: steps.completed().clone(),
            errors: steps.errors().clone(),
            last_error: steps.last_error().cloned(),
            draft: draft.map(RegistrationDraft::snapshot),
            account_number_hint: draft
                .and_then(|draft| account_number_progress(draft.profile().account_number())),
            verification,
            gate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::directory::{BankEntry, CategoryCatalog};
    use crate::registration::draft::DraftEdit;
    use crate::verification::VerificationState;

    #[test]
    fn gate_shows_settlement_data_verbatim_only_while_confirming() {
        let mut draft = RegistrationDraft::new();
        draft.apply(
            DraftEdit::AccountNumber("0012345678".into()),
            &CategoryCatalog::default(),
        );
        draft.select_bank(BankEntry::new("Zenith Bank", "057"));
        let verification = VerificationState::new().snapshot();

        let mut steps = StepState::default();
        steps.enter(RegistrationStage::Editing(RegistrationStep::BusinessDetails));
        let editing = RegistrationSnapshot::capture(&steps, Some(&draft), verification.clone());
        assert_eq!(editing.gate, None);
        assert_eq!(editing.account_number_hint, None);

        steps.enter(RegistrationStage::Confirming);
        let confirming = RegistrationSnapshot::capture(&steps, Some(&draft), verification);
        let gate = confirming.gate.unwrap();
        assert_eq!(gate.account_number, "0012345678");
        assert_eq!(gate.bank_name, "Zenith Bank");
        assert_eq!(gate.warning, IMMUTABLE_SETTLEMENT_WARNING);
    }

    #[test]
    fn partial_account_number_produces_progress_hint() {
        let mut draft = RegistrationDraft::new();
        draft.apply(
            DraftEdit::AccountNumber("0123".into()),
            &CategoryCatalog::default(),
        );
        let snapshot = RegistrationSnapshot::capture(
            &StepState::default(),
            Some(&draft),
            VerificationState::new().snapshot(),
        );
        assert_eq!(
            snapshot.account_number_hint.as_deref(),
            Some("Account number must be 10 digits (4 of 10 entered).")
        );
    }
}
