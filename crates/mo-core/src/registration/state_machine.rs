//! Registration workflow state machine.
//!
//! Pure transition function `(stage, event) -> (stage, actions)`. The
//! controller in `mo-app` validates input, feeds events in, and executes the
//! returned actions.
//!
//! ```text
//! Editing(1) --StepCompleted--> [DispatchVerificationCode]
//!            --VerificationDispatched--> Editing(2)
//! Editing(2) --StepCompleted--> Editing(3)            (only fed once verified)
//! Editing(3) --StepCompleted--> Editing(4)
//! Editing(4) --SubmissionChecked--> Confirming
//! Confirming --ConfirmSubmit--> Submitting [SubmitRegistration]
//!            --CancelConfirm--> Editing(4)
//! Submitting --SubmissionAccepted--> Submitted [DiscardDraft]
//!            --SubmissionRejected--> Editing(rewind target or 4)
//! ```

use crate::ids::AccountId;
use crate::registration::step::{RegistrationStage, RegistrationStep};

/// Facts that drive the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationEvent {
    /// The current step's gate passed (local validation, or verified for step 2).
    StepCompleted,
    /// Availability check and code dispatch for step 1 both succeeded.
    VerificationDispatched,
    /// User navigates back one step.
    Retreat,
    /// Pre-submission checks passed on step 4.
    SubmissionChecked,
    /// Pre-submission checks failed; go to the earliest failing step.
    SubmissionCheckFailed { rewind_to: RegistrationStep },
    /// User confirms in the gate.
    ConfirmSubmit,
    /// User cancels in the gate.
    CancelConfirm,
    /// Registration service created the account.
    SubmissionAccepted { account_id: AccountId },
    /// Registration service rejected the submission. `None` means a general
    /// failure with no field to rewind to.
    SubmissionRejected { rewind_to: Option<RegistrationStep> },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationAction {
    /// Check email availability, then send the first code.
    DispatchVerificationCode,
    /// Put the verification subsystem back to idle.
    ResetVerification,
    /// Perform the single registration call.
    SubmitRegistration,
    /// Drop the draft and all session data.
    DiscardDraft,
}

pub struct RegistrationStateMachine;

impl RegistrationStateMachine {
    pub fn transition(
        stage: RegistrationStage,
        event: RegistrationEvent,
    ) -> (RegistrationStage, Vec<RegistrationAction>) {
        use RegistrationStage::*;
        use RegistrationStep::*;

        match (stage, event) {
            // ===== Forward =====
            (Editing(Credentials), RegistrationEvent::StepCompleted) => (
                Editing(Credentials),
                vec![RegistrationAction::DispatchVerificationCode],
            ),
            (Editing(Credentials), RegistrationEvent::VerificationDispatched) => {
                (Editing(EmailVerification), Vec::new())
            }
            (Editing(EmailVerification), RegistrationEvent::StepCompleted) => {
                (Editing(BusinessProfile), Vec::new())
            }
            (Editing(BusinessProfile), RegistrationEvent::StepCompleted) => {
                (Editing(BusinessDetails), Vec::new())
            }

            // ===== Back =====
            (Editing(step), RegistrationEvent::Retreat) => match step.previous() {
                Some(previous) => {
                    let actions = if step == EmailVerification {
                        vec![RegistrationAction::ResetVerification]
                    } else {
                        Vec::new()
                    };
                    (Editing(previous), actions)
                }
                None => (Editing(step), Vec::new()),
            },

            // ===== Submission checks =====
            (Editing(BusinessDetails), RegistrationEvent::SubmissionChecked) => {
                (Confirming, Vec::new())
            }
            (Editing(BusinessDetails), RegistrationEvent::SubmissionCheckFailed { rewind_to }) => {
                rewind(rewind_to)
            }

            // ===== Confirmation gate =====
            (Confirming, RegistrationEvent::ConfirmSubmit) => {
                (Submitting, vec![RegistrationAction::SubmitRegistration])
            }
            (Confirming, RegistrationEvent::CancelConfirm) => {
                (Editing(BusinessDetails), Vec::new())
            }

            // ===== Result =====
            (Submitting, RegistrationEvent::SubmissionAccepted { account_id }) => (
                Submitted { account_id },
                vec![RegistrationAction::DiscardDraft],
            ),
            (Submitting, RegistrationEvent::SubmissionRejected { rewind_to }) => {
                rewind(rewind_to.unwrap_or(BusinessDetails))
            }

            (stage, _event) => (stage, Vec::new()),
        }
    }
}

/// Rewinding onto or before step 2 means the verified email is in question,
/// so verification starts over.
fn rewind(target: RegistrationStep) -> (RegistrationStage, Vec<RegistrationAction>) {
    let actions = if target <= RegistrationStep::EmailVerification {
        vec![RegistrationAction::ResetVerification]
    } else {
        Vec::new()
    };
    (RegistrationStage::Editing(target), actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(step: RegistrationStep) -> RegistrationStage {
        RegistrationStage::Editing(step)
    }

    #[test]
    fn completing_step_one_requests_code_dispatch_without_moving() {
        let (next, actions) = RegistrationStateMachine::transition(
            editing(RegistrationStep::Credentials),
            RegistrationEvent::StepCompleted,
        );
        assert_eq!(next, editing(RegistrationStep::Credentials));
        assert_eq!(actions, vec![RegistrationAction::DispatchVerificationCode]);

        let (next, actions) = RegistrationStateMachine::transition(
            next,
            RegistrationEvent::VerificationDispatched,
        );
        assert_eq!(next, editing(RegistrationStep::EmailVerification));
        assert!(actions.is_empty());
    }

    #[test]
    fn retreat_from_verification_resets_it() {
        let (next, actions) = RegistrationStateMachine::transition(
            editing(RegistrationStep::EmailVerification),
            RegistrationEvent::Retreat,
        );
        assert_eq!(next, editing(RegistrationStep::Credentials));
        assert_eq!(actions, vec![RegistrationAction::ResetVerification]);
    }

    #[test]
    fn retreat_from_first_step_is_noop() {
        let (next, actions) = RegistrationStateMachine::transition(
            editing(RegistrationStep::Credentials),
            RegistrationEvent::Retreat,
        );
        assert_eq!(next, editing(RegistrationStep::Credentials));
        assert!(actions.is_empty());
    }

    #[test]
    fn retreat_from_later_steps_keeps_verification() {
        let (next, actions) = RegistrationStateMachine::transition(
            editing(RegistrationStep::BusinessProfile),
            RegistrationEvent::Retreat,
        );
        assert_eq!(next, editing(RegistrationStep::EmailVerification));
        assert!(actions.is_empty());
    }

    #[test]
    fn gate_cancel_returns_to_last_step() {
        let (next, actions) = RegistrationStateMachine::transition(
            RegistrationStage::Confirming,
            RegistrationEvent::CancelConfirm,
        );
        assert_eq!(next, editing(RegistrationStep::BusinessDetails));
        assert!(actions.is_empty());
    }

    #[test]
    fn gate_ignores_navigation() {
        for event in [RegistrationEvent::Retreat, RegistrationEvent::StepCompleted] {
            let (next, actions) =
                RegistrationStateMachine::transition(RegistrationStage::Confirming, event);
            assert_eq!(next, RegistrationStage::Confirming);
            assert!(actions.is_empty());
        }
    }

    #[test]
    fn in_flight_submission_cannot_be_cancelled() {
        let (next, actions) = RegistrationStateMachine::transition(
            RegistrationStage::Submitting,
            RegistrationEvent::CancelConfirm,
        );
        assert_eq!(next, RegistrationStage::Submitting);
        assert!(actions.is_empty());
    }

    #[test]
    fn confirm_submits_and_acceptance_discards_draft() {
        let (next, actions) = RegistrationStateMachine::transition(
            RegistrationStage::Confirming,
            RegistrationEvent::ConfirmSubmit,
        );
        assert_eq!(next, RegistrationStage::Submitting);
        assert_eq!(actions, vec![RegistrationAction::SubmitRegistration]);

        let account_id = AccountId::from("acct-42");
        let (next, actions) = RegistrationStateMachine::transition(
            next,
            RegistrationEvent::SubmissionAccepted {
                account_id: account_id.clone(),
            },
        );
        assert_eq!(next, RegistrationStage::Submitted { account_id });
        assert_eq!(actions, vec![RegistrationAction::DiscardDraft]);
    }

    #[test]
    fn field_rejection_rewinds_and_general_rejection_stays_on_last_step() {
        let (next, actions) = RegistrationStateMachine::transition(
            RegistrationStage::Submitting,
            RegistrationEvent::SubmissionRejected {
                rewind_to: Some(RegistrationStep::BusinessProfile),
            },
        );
        assert_eq!(next, editing(RegistrationStep::BusinessProfile));
        assert!(actions.is_empty());

        let (next, actions) = RegistrationStateMachine::transition(
            RegistrationStage::Submitting,
            RegistrationEvent::SubmissionRejected { rewind_to: None },
        );
        assert_eq!(next, editing(RegistrationStep::BusinessDetails));
        assert!(actions.is_empty());
    }

    #[test]
    fn rejection_rewinding_to_first_step_resets_verification() {
        let (next, actions) = RegistrationStateMachine::transition(
            RegistrationStage::Submitting,
            RegistrationEvent::SubmissionRejected {
                rewind_to: Some(RegistrationStep::Credentials),
            },
        );
        assert_eq!(next, editing(RegistrationStep::Credentials));
        assert_eq!(actions, vec![RegistrationAction::ResetVerification]);
    }

    #[test]
    fn rejection_rewinding_to_verification_resets_it() {
        let (next, actions) = RegistrationStateMachine::transition(
            RegistrationStage::Submitting,
            RegistrationEvent::SubmissionRejected {
                rewind_to: Some(RegistrationStep::EmailVerification),
            },
        );
        assert_eq!(next, editing(RegistrationStep::EmailVerification));
        assert_eq!(actions, vec![RegistrationAction::ResetVerification]);
    }

    #[test]
    fn submitted_is_terminal() {
        let stage = RegistrationStage::Submitted {
            account_id: AccountId::from("acct-1"),
        };
        let (next, actions) =
            RegistrationStateMachine::transition(stage.clone(), RegistrationEvent::Retreat);
        assert_eq!(next, stage);
        assert!(actions.is_empty());
    }
}
