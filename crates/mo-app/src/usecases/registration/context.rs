use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use mo_core::registration::{BankEntry, RegistrationDraft, StepState};

/// Everything the controller owns for one registration attempt.
#[derive(Debug, Default)]
pub struct RegistrationSession {
    pub steps: StepState,
    /// `None` once the draft has been discarded after a successful submission.
    pub draft: Option<RegistrationDraft>,
    /// Bank entries returned by directory lookups in this session.
    pub offered_banks: Vec<BankEntry>,
}

impl RegistrationSession {
    pub fn new() -> Self {
        Self {
            steps: StepState::default(),
            draft: Some(RegistrationDraft::new()),
            offered_banks: Vec::new(),
        }
    }

    pub fn remember_offered(&mut self, entries: &[BankEntry]) {
        for entry in entries {
            if !self.offered_banks.iter().any(|known| known.code == entry.code) {
                self.offered_banks.push(entry.clone());
            }
        }
    }

    pub fn offered_bank(&self, code: &str) -> Option<&BankEntry> {
        self.offered_banks.iter().find(|entry| entry.code == code)
    }
}

/// Shared registration context containing session state and dispatch lock.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `session`.
/// - `dispatch_lock`: serializes workflow operations (edits, navigation,
///   submission). Verification calls do not take it.
/// - `session`: short critical sections only; never held across a port call.
#[derive(Clone)]
pub struct RegistrationContext {
    session: Arc<Mutex<RegistrationSession>>,
    dispatch_lock: Arc<Mutex<()>>,
}

impl RegistrationContext {
    pub fn new(session: RegistrationSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub async fn session(&self) -> MutexGuard<'_, RegistrationSession> {
        self.session.lock().await
    }

    /// Returns a guard that releases the lock when dropped.
    pub async fn acquire_dispatch_lock(&self) -> MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }
}

impl Default for RegistrationContext {
    fn default() -> Self {
        Self::new(RegistrationSession::new())
    }
}
