use crate::registration::RegistrationSnapshot;

#[async_trait::async_trait]
pub trait RegistrationEventPort: Send + Sync {
    async fn emit_registration_changed(&self, snapshot: RegistrationSnapshot);
}
