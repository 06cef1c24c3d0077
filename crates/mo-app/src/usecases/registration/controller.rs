//! Registration session controller.
//!
//! Coordinates the registration state machine with validation, email
//! verification and the registration service. Every user-actionable failure
//! is folded into the session state; only misuse of the controller itself is
//! returned as an error.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, info_span, warn, Instrument};

use mo_core::ports::{
    BankDirectoryPort, CategoryCatalogPort, IdentityVerificationPort, RegistrationEventPort,
    RegistrationServicePort, SubmissionError,
};
use mo_core::registration::attribution::{attribute, owning_step};
use mo_core::registration::validation::{validate, validate_submission};
use mo_core::registration::{
    BankEntry, BusinessCategory, CategoryCatalog, DraftEdit, DraftField, DraftSnapshot,
    FieldErrors, RegistrationAction, RegistrationDraft, RegistrationError, RegistrationEvent,
    RegistrationSnapshot, RegistrationStage, RegistrationStateMachine, RegistrationStep,
    RegistrationSubmission,
};
use mo_core::verification::VerificationError;

use crate::usecases::registration::context::{RegistrationContext, RegistrationSession};
use crate::usecases::registration::error::ControllerError;
use crate::usecases::verification::EmailVerification;

const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";
const INVALID_CODE_FORMAT_MESSAGE: &str = "Enter the 5-digit code sent to your email.";
const INCORRECT_CODE_MESSAGE: &str = "The code you entered is incorrect.";

/// Ports the controller talks to.
pub struct RegistrationDeps {
    pub identity: Arc<dyn IdentityVerificationPort>,
    pub registration_service: Arc<dyn RegistrationServicePort>,
    pub bank_directory: Arc<dyn BankDirectoryPort>,
    pub category_catalog: Arc<dyn CategoryCatalogPort>,
    pub event_port: Arc<dyn RegistrationEventPort>,
}

pub struct RegistrationController {
    context: Arc<RegistrationContext>,
    verification: EmailVerification,
    /// Fetched on first use, then authoritative for the rest of the session.
    categories: OnceCell<CategoryCatalog>,
    registration_service: Arc<dyn RegistrationServicePort>,
    bank_directory: Arc<dyn BankDirectoryPort>,
    category_catalog: Arc<dyn CategoryCatalogPort>,
    event_port: Arc<dyn RegistrationEventPort>,
}

impl RegistrationController {
    pub fn new(deps: RegistrationDeps) -> Self {
        Self {
            context: RegistrationContext::default().arc(),
            verification: EmailVerification::new(deps.identity),
            categories: OnceCell::new(),
            registration_service: deps.registration_service,
            bank_directory: deps.bank_directory,
            category_catalog: deps.category_catalog,
            event_port: deps.event_port,
        }
    }

    // ===== Queries =====

    pub async fn snapshot(&self) -> RegistrationSnapshot {
        let verification = self.verification.snapshot().await;
        let session = self.context.session().await;
        RegistrationSnapshot::capture(&session.steps, session.draft.as_ref(), verification)
    }

    pub async fn current_step(&self) -> Option<RegistrationStep> {
        self.context.session().await.steps.current_step()
    }

    pub async fn draft_snapshot(&self) -> Option<DraftSnapshot> {
        self.context
            .session()
            .await
            .draft
            .as_ref()
            .map(RegistrationDraft::snapshot)
    }

    pub async fn errors(&self) -> FieldErrors {
        self.context.session().await.steps.errors().clone()
    }

    pub async fn last_error(&self) -> Option<RegistrationError> {
        self.context.session().await.steps.last_error().cloned()
    }

    /// Categories offered for step 3, fetched once per session.
    ///
    /// A failed fetch is recorded as the last error and yields an empty list;
    /// the next call tries again.
    pub async fn business_categories(&self) -> Vec<BusinessCategory> {
        match self.load_categories().await {
            Ok(catalog) => catalog.categories().to_vec(),
            Err(err) => {
                warn!(error = %err, "business categories could not be loaded");
                self.record_general_failure(format!(
                    "Business categories could not be loaded: {err}"
                ))
                .await;
                Vec::new()
            }
        }
    }

    // ===== Draft edits =====

    /// Apply one edit to a field of the current step and clear that field's error.
    pub async fn edit(&self, edit: DraftEdit) -> Result<RegistrationSnapshot, ControllerError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        let field = edit.field();
        let step = self.editable_step("edit").await?;
        if owning_step(&field) != step {
            return Err(ControllerError::FieldNotEditable { field, step });
        }

        let mut catalog_error = None;
        let catalog = if matches!(edit, DraftEdit::BusinessCategory(_)) {
            match self.load_categories().await {
                Ok(catalog) => Some(catalog),
                Err(err) => {
                    warn!(error = %err, "business categories could not be loaded");
                    catalog_error = Some(RegistrationError::General(format!(
                        "Business categories could not be loaded: {err}"
                    )));
                    None
                }
            }
        } else {
            None
        };
        let empty = CategoryCatalog::default();

        {
            let mut session = self.context.session().await;
            let session = &mut *session;
            let draft = editable_draft(session, "edit")?;
            draft.apply(edit, catalog.unwrap_or(&empty));
            session.steps.errors_mut().clear(&field);
            if catalog_error.is_some() {
                session.steps.set_last_error(catalog_error);
            }
        }
        debug!(field = %field, "draft edited");

        self.emit().await;
        Ok(self.snapshot().await)
    }

    /// Look up settlement banks. Returned entries become selectable.
    ///
    /// A failed lookup is recorded as the last error and offers nothing.
    pub async fn search_banks(&self, query: &str) -> Result<Vec<BankEntry>, ControllerError> {
        self.require_bank_step().await?;

        let span = info_span!("usecase.registration.search_banks");
        let result = self
            .bank_directory
            .search_banks(query)
            .instrument(span)
            .await;

        match result {
            Ok(entries) => {
                self.context.session().await.remember_offered(&entries);
                Ok(entries)
            }
            Err(err) => {
                warn!(error = %err, "bank directory lookup failed");
                self.record_general_failure(format!(
                    "Bank directory could not be searched: {err}"
                ))
                .await;
                Ok(Vec::new())
            }
        }
    }

    /// Set bank name and code together from an entry offered by [`Self::search_banks`].
    pub async fn select_bank(&self, code: &str) -> Result<RegistrationSnapshot, ControllerError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        self.require_bank_step().await?;

        {
            let mut session = self.context.session().await;
            let entry = session
                .offered_bank(code)
                .cloned()
                .ok_or_else(|| ControllerError::UnknownBank(code.to_string()))?;
            let session = &mut *session;
            editable_draft(session, "select_bank")?.select_bank(entry);
            session.steps.errors_mut().clear(&DraftField::BankName);
        }
        debug!(bank_code = code, "settlement bank selected");

        self.emit().await;
        Ok(self.snapshot().await)
    }

    // ===== Navigation =====

    /// Validate the current step and move forward.
    ///
    /// Step 1 additionally checks email availability and dispatches the first
    /// code before moving. Step 2 moves only once the email is verified and
    /// is a silent no-op otherwise.
    pub async fn advance(&self) -> Result<RegistrationSnapshot, ControllerError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        let step = self.editable_step("advance").await?;

        let span = info_span!("usecase.registration.advance", step = step.number());
        async {
            match step {
                RegistrationStep::EmailVerification => {
                    if !self.verification.is_verified().await {
                        debug!("advance ignored, email not verified");
                        return Ok(self.snapshot().await);
                    }
                    self.dispatch(RegistrationEvent::StepCompleted).await
                }
                RegistrationStep::BusinessDetails => Err(ControllerError::NotAllowed {
                    operation: "advance",
                    stage: RegistrationStage::Editing(step),
                }),
                RegistrationStep::Credentials | RegistrationStep::BusinessProfile => {
                    let errors = {
                        let mut session = self.context.session().await;
                        let errors = validate(step, editable_draft(&mut session, "advance")?);
                        record_step_errors(&mut session, &[step], errors)
                    };
                    if !errors.is_empty() {
                        info!(fields = errors.len(), "step validation failed");
                        self.emit().await;
                        return Ok(self.snapshot().await);
                    }
                    self.dispatch(RegistrationEvent::StepCompleted).await
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Go back one step. Leaving step 2 resets verification.
    pub async fn retreat(&self) -> Result<RegistrationSnapshot, ControllerError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        self.editable_step("retreat").await?;
        self.dispatch(RegistrationEvent::Retreat).await
    }

    /// Run the pre-submission checks and open the confirmation gate.
    pub async fn submit(&self) -> Result<RegistrationSnapshot, ControllerError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        let step = self.editable_step("submit").await?;
        if step != RegistrationStep::LAST {
            return Err(ControllerError::NotAllowed {
                operation: "submit",
                stage: RegistrationStage::Editing(step),
            });
        }

        let span = info_span!("usecase.registration.submit");
        async {
            let errors = {
                let mut session = self.context.session().await;
                let errors = validate_submission(editable_draft(&mut session, "submit")?);
                record_step_errors(
                    &mut session,
                    &[
                        RegistrationStep::BusinessProfile,
                        RegistrationStep::BusinessDetails,
                    ],
                    errors,
                )
            };

            let event = match attribute(&errors) {
                None => RegistrationEvent::SubmissionChecked,
                Some(rewind_to) => {
                    info!(fields = errors.len(), %rewind_to, "submission checks failed");
                    RegistrationEvent::SubmissionCheckFailed { rewind_to }
                }
            };
            self.dispatch(event).await
        }
        .instrument(span)
        .await
    }

    /// Confirmation gate: perform the irreversible submission.
    pub async fn confirm_submit(&self) -> Result<RegistrationSnapshot, ControllerError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        self.require_gate("confirm_submit").await?;
        self.dispatch(RegistrationEvent::ConfirmSubmit).await
    }

    /// Confirmation gate: back to step 4 with the draft untouched.
    pub async fn cancel_confirm(&self) -> Result<RegistrationSnapshot, ControllerError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        self.require_gate("cancel_confirm").await?;
        self.dispatch(RegistrationEvent::CancelConfirm).await
    }

    // ===== Verification =====
    //
    // These bypass the dispatch lock so a resend can overtake a pending send
    // or verify. Stale results are dropped by the verification state.

    /// Send a code for the draft email when no session is live (e.g. after expiry).
    pub async fn send_code(&self) -> Result<RegistrationSnapshot, ControllerError> {
        let email = self.verification_email("send_code").await?;
        let result = self.verification.send_code(&email).await;
        self.settle_verification(result).await
    }

    pub async fn resend_code(&self) -> Result<RegistrationSnapshot, ControllerError> {
        let email = self.verification_email("resend_code").await?;
        let result = self.verification.resend(&email).await;
        self.settle_verification(result).await
    }

    pub async fn verify_code(&self, code: &str) -> Result<RegistrationSnapshot, ControllerError> {
        let email = self.verification_email("verify_code").await?;
        let result = self.verification.verify_code(&email, code).await;
        self.settle_verification(result).await
    }

    // ===== Internals =====

    async fn dispatch(
        &self,
        event: RegistrationEvent,
    ) -> Result<RegistrationSnapshot, ControllerError> {
        let span = info_span!("usecase.registration.dispatch", event = ?event);
        async {
            let mut pending_events = vec![event];

            while let Some(event) = pending_events.pop() {
                let from = self.context.session().await.steps.stage().clone();
                let event_name = format!("{:?}", event);
                let (next, actions) = RegistrationStateMachine::transition(from.clone(), event);
                info!(
                    from = ?from,
                    to = ?next,
                    event = %event_name,
                    "registration stage transition"
                );
                self.context.session().await.steps.enter(next);
                self.emit().await;

                let follow_up_events = self.execute_actions(actions).await?;
                pending_events.extend(follow_up_events);
            }

            Ok(self.snapshot().await)
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(
        &self,
        actions: Vec<RegistrationAction>,
    ) -> Result<Vec<RegistrationEvent>, ControllerError> {
        let mut follow_up_events = Vec::new();
        for action in actions {
            debug!(?action, "registration executing action");
            match action {
                RegistrationAction::DispatchVerificationCode => {
                    let email = self.draft_email().await;
                    let result = match self.verification.send_code(&email).await {
                        // Left over from a step 2 call that lost a race with a
                        // retreat. Step 1 never owns a live session.
                        Err(VerificationError::AlreadySent)
                        | Err(VerificationError::AlreadyVerified) => {
                            warn!("stale verification state on step 1, resetting");
                            self.verification.reset().await;
                            self.verification.send_code(&email).await
                        }
                        result => result,
                    };
                    match result {
                        Ok(()) => {
                            self.context.session().await.steps.set_last_error(None);
                            follow_up_events.push(RegistrationEvent::VerificationDispatched);
                        }
                        Err(err) => self.record_verification_failure(err).await?,
                    }
                }
                RegistrationAction::ResetVerification => {
                    self.verification.reset().await;
                }
                RegistrationAction::SubmitRegistration => {
                    follow_up_events.push(self.submit_registration().await);
                }
                RegistrationAction::DiscardDraft => {
                    {
                        let mut session = self.context.session().await;
                        session.draft = None;
                        session.offered_banks.clear();
                        session.steps.errors_mut().clear_all();
                        session.steps.set_last_error(None);
                    }
                    self.verification.reset().await;
                }
            }
        }
        Ok(follow_up_events)
    }

    /// The single registration call. Always yields the event that settles
    /// the in-flight submission.
    async fn submit_registration(&self) -> RegistrationEvent {
        let submission = {
            let mut session = self.context.session().await;
            let Some(draft) = session.draft.as_ref() else {
                return RegistrationEvent::SubmissionRejected { rewind_to: None };
            };
            match RegistrationSubmission::from_draft(draft) {
                Some(submission) => submission,
                None => {
                    let errors = validate_submission(draft);
                    let rewind_to = attribute(&errors);
                    session.steps.errors_mut().merge(errors.clone());
                    session
                        .steps
                        .set_last_error(Some(RegistrationError::Validation(errors)));
                    return RegistrationEvent::SubmissionRejected { rewind_to };
                }
            }
        };

        let result = self
            .registration_service
            .submit_registration(&submission)
            .await;

        let mut session = self.context.session().await;
        match result {
            Ok(account_id) => {
                info!(account_id = %account_id, "registration submitted");
                RegistrationEvent::SubmissionAccepted { account_id }
            }
            Err(SubmissionError::FieldValidation(fields)) => {
                let errors = FieldErrors::from_wire(fields);
                let rewind_to = attribute(&errors);
                info!(fields = errors.len(), rewind_to = ?rewind_to, "registration rejected");
                session.steps.errors_mut().merge(errors.clone());
                session
                    .steps
                    .set_last_error(Some(RegistrationError::FieldValidation(errors)));
                RegistrationEvent::SubmissionRejected { rewind_to }
            }
            Err(SubmissionError::General(message)) => {
                warn!(error = %message, "registration failed");
                session
                    .steps
                    .set_last_error(Some(RegistrationError::General(message)));
                RegistrationEvent::SubmissionRejected { rewind_to: None }
            }
        }
    }

    async fn settle_verification(
        &self,
        result: Result<(), VerificationError>,
    ) -> Result<RegistrationSnapshot, ControllerError> {
        match result {
            Ok(()) => {
                let mut session = self.context.session().await;
                session
                    .steps
                    .errors_mut()
                    .clear(&DraftField::VerificationCode);
                session.steps.set_last_error(None);
            }
            Err(err) => self.record_verification_failure(err).await?,
        }
        self.emit().await;
        Ok(self.snapshot().await)
    }

    /// Fold a verification failure into session state. Refusals caused by
    /// calling in the wrong verification phase are returned instead.
    async fn record_verification_failure(
        &self,
        err: VerificationError,
    ) -> Result<(), ControllerError> {
        let (field_error, error) = match err {
            VerificationError::InvalidEmail => {
                let errors = single(DraftField::Email, INVALID_EMAIL_MESSAGE);
                (
                    Some((DraftField::Email, INVALID_EMAIL_MESSAGE.to_string())),
                    RegistrationError::Validation(errors),
                )
            }
            VerificationError::InvalidCodeFormat => {
                let errors = single(DraftField::VerificationCode, INVALID_CODE_FORMAT_MESSAGE);
                (
                    Some((
                        DraftField::VerificationCode,
                        INVALID_CODE_FORMAT_MESSAGE.to_string(),
                    )),
                    RegistrationError::Validation(errors),
                )
            }
            VerificationError::EmailTaken(message) => (
                Some((DraftField::Email, message.clone())),
                RegistrationError::Conflict(message),
            ),
            VerificationError::ExpiredSession => (None, RegistrationError::ExpiredSession),
            VerificationError::InvalidCode => (
                Some((
                    DraftField::VerificationCode,
                    INCORRECT_CODE_MESSAGE.to_string(),
                )),
                RegistrationError::InvalidCode,
            ),
            VerificationError::Service(message) => (None, RegistrationError::General(message)),
            VerificationError::Superseded => {
                debug!("verification result superseded, ignoring");
                return Ok(());
            }
            refused => return Err(ControllerError::Verification(refused)),
        };

        let mut session = self.context.session().await;
        if let Some((field, message)) = field_error {
            session.steps.errors_mut().set(field, message);
        }
        session.steps.set_last_error(Some(error));
        Ok(())
    }

    async fn record_general_failure(&self, message: String) {
        self.context
            .session()
            .await
            .steps
            .set_last_error(Some(RegistrationError::General(message)));
        self.emit().await;
    }

    async fn load_categories(&self) -> anyhow::Result<&CategoryCatalog> {
        self.categories
            .get_or_try_init(|| async {
                let categories = self.category_catalog.list_categories().await?;
                info!(count = categories.len(), "business categories loaded");
                Ok::<_, anyhow::Error>(CategoryCatalog::new(categories))
            })
            .await
    }

    async fn editable_step(
        &self,
        operation: &'static str,
    ) -> Result<RegistrationStep, ControllerError> {
        match self.context.session().await.steps.stage() {
            RegistrationStage::Editing(step) => Ok(*step),
            stage => Err(ControllerError::NotAllowed {
                operation,
                stage: stage.clone(),
            }),
        }
    }

    async fn require_bank_step(&self) -> Result<(), ControllerError> {
        let step = self.editable_step("bank selection").await?;
        if step != RegistrationStep::BusinessProfile {
            return Err(ControllerError::FieldNotEditable {
                field: DraftField::BankName,
                step,
            });
        }
        Ok(())
    }

    async fn require_gate(&self, operation: &'static str) -> Result<(), ControllerError> {
        match self.context.session().await.steps.stage() {
            RegistrationStage::Confirming => Ok(()),
            stage => Err(ControllerError::NotAllowed {
                operation,
                stage: stage.clone(),
            }),
        }
    }

    /// Draft email, provided the user is on the verification step.
    async fn verification_email(&self, operation: &'static str) -> Result<String, ControllerError> {
        let step = self.editable_step(operation).await?;
        if step != RegistrationStep::EmailVerification {
            return Err(ControllerError::NotAllowed {
                operation,
                stage: RegistrationStage::Editing(step),
            });
        }
        Ok(self.draft_email().await)
    }

    async fn draft_email(&self) -> String {
        self.context
            .session()
            .await
            .draft
            .as_ref()
            .map(|draft| draft.credentials().email().trim().to_string())
            .unwrap_or_default()
    }

    async fn emit(&self) {
        let snapshot = self.snapshot().await;
        self.event_port.emit_registration_changed(snapshot).await;
    }
}

fn editable_draft<'a>(
    session: &'a mut RegistrationSession,
    operation: &'static str,
) -> Result<&'a mut RegistrationDraft, ControllerError> {
    let stage = session.steps.stage().clone();
    session
        .draft
        .as_mut()
        .ok_or(ControllerError::NotAllowed { operation, stage })
}

/// Replace the errors owned by `steps` with `errors`. Returns `errors`.
fn record_step_errors(
    session: &mut RegistrationSession,
    steps: &[RegistrationStep],
    errors: FieldErrors,
) -> FieldErrors {
    let field_errors = session.steps.errors_mut();
    field_errors.retain(|field| !steps.contains(&owning_step(field)));
    if errors.is_empty() {
        session.steps.set_last_error(None);
    } else {
        field_errors.merge(errors.clone());
        session
            .steps
            .set_last_error(Some(RegistrationError::Validation(errors.clone())));
    }
    errors
}

fn single(field: DraftField, message: &str) -> FieldErrors {
    [(field, message.to_string())].into_iter().collect()
}
