use async_trait::async_trait;
use mo_core::ports::RegistrationEventPort;
use mo_core::registration::RegistrationSnapshot;
use tracing::{debug, info};

/// Publishes registration changes to the log.
#[derive(Debug, Default)]
pub struct TracingRegistrationEvents;

#[async_trait]
impl RegistrationEventPort for TracingRegistrationEvents {
    async fn emit_registration_changed(&self, snapshot: RegistrationSnapshot) {
        info!(
            stage = ?snapshot.stage,
            errors = snapshot.errors.len(),
            "registration changed"
        );
        match serde_json::to_string(&snapshot) {
            Ok(json) => debug!(snapshot = %json, "registration snapshot"),
            Err(err) => debug!(error = %err, "registration snapshot not serializable"),
        }
    }
}
