use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::AccountId;
use crate::registration::error::RegistrationError;
use crate::registration::field::FieldErrors;

/// One of the four ordered phases of the registration workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RegistrationStep {
    /// Email, password and confirmation.
    Credentials,
    /// One-time code proof of email ownership.
    EmailVerification,
    /// Identity, business and settlement account data.
    BusinessProfile,
    /// Store details, tax/registration numbers and documents.
    BusinessDetails,
}

impl RegistrationStep {
    pub const ALL: [RegistrationStep; 4] = [
        RegistrationStep::Credentials,
        RegistrationStep::EmailVerification,
        RegistrationStep::BusinessProfile,
        RegistrationStep::BusinessDetails,
    ];

    pub const FIRST: RegistrationStep = RegistrationStep::Credentials;
    pub const LAST: RegistrationStep = RegistrationStep::BusinessDetails;

    /// 1-based step index shown to the user.
    pub fn number(self) -> u8 {
        match self {
            RegistrationStep::Credentials => 1,
            RegistrationStep::EmailVerification => 2,
            RegistrationStep::BusinessProfile => 3,
            RegistrationStep::BusinessDetails => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }
}

impl std::fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {}", self.number())
    }
}

/// Where the workflow currently is, including the states past step 4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStage {
    /// User is filling in a step.
    Editing(RegistrationStep),
    /// Confirmation gate is open over step 4.
    Confirming,
    /// Confirmed; the single submission call is in flight.
    Submitting,
    /// Account created. Terminal.
    Submitted { account_id: AccountId },
}

impl RegistrationStage {
    /// The step the user is looking at. The gate and the in-flight submission
    /// are both shown over step 4; a finished workflow has no step.
    pub fn step(&self) -> Option<RegistrationStep> {
        match self {
            RegistrationStage::Editing(step) => Some(*step),
            RegistrationStage::Confirming | RegistrationStage::Submitting => {
                Some(RegistrationStep::LAST)
            }
            RegistrationStage::Submitted { .. } => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, RegistrationStage::Editing(_))
    }
}

impl Default for RegistrationStage {
    fn default() -> Self {
        RegistrationStage::Editing(RegistrationStep::FIRST)
    }
}

/// Step progress plus the draft-wide error map.
///
/// Errors are scoped to the whole draft rather than per step so that one error
/// set coming back from the server can be redistributed after attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepState {
    stage: RegistrationStage,
    completed: BTreeSet<RegistrationStep>,
    errors: FieldErrors,
    last_error: Option<RegistrationError>,
}

impl StepState {
    pub fn stage(&self) -> &RegistrationStage {
        &self.stage
    }

    pub fn current_step(&self) -> Option<RegistrationStep> {
        self.stage.step()
    }

    pub fn completed(&self) -> &BTreeSet<RegistrationStep> {
        &self.completed
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut FieldErrors {
        &mut self.errors
    }

    pub fn last_error(&self) -> Option<&RegistrationError> {
        self.last_error.as_ref()
    }

    pub fn set_last_error(&mut self, error: Option<RegistrationError>) {
        self.last_error = error;
    }

    /// Move to `stage`, keeping the completed set consistent: moving forward
    /// marks every earlier step completed, moving back forgets the target
    /// step and everything after it.
    pub fn enter(&mut self, stage: RegistrationStage) {
        if let Some(target) = stage.step() {
            let previous = self.stage.step();
            if previous.map_or(true, |previous| target > previous) {
                self.completed
                    .extend(RegistrationStep::ALL.into_iter().filter(|s| *s < target));
            } else if matches!(stage, RegistrationStage::Editing(_)) {
                self.completed.retain(|s| *s < target);
            }
        } else {
            self.completed.extend(RegistrationStep::ALL);
        }
        self.stage = stage;
    }
}
