//! Dependency wiring: builds the controller's ports from configuration.

use std::sync::Arc;

use tracing::info;

use mo_app::{RegistrationController, RegistrationDeps};
use mo_core::config::AppConfig;
use mo_infra::{
    FileBankDirectory, FileCategoryCatalog, SandboxIdentityVerification,
    SandboxRegistrationService, SandboxRegistry, TracingRegistrationEvents,
};

/// Code the sandbox accepts when the config does not name one.
pub const DEFAULT_SANDBOX_CODE: &str = "12345";

/// Code the sandbox identity service accepts for `config`.
pub fn sandbox_code(config: &AppConfig) -> String {
    match config.sandbox_verification_code.trim() {
        "" => DEFAULT_SANDBOX_CODE.to_string(),
        code => code.to_string(),
    }
}

/// Build ports backed by the local directory files and sandbox services.
///
/// Both sandbox services share one registry, so an email registered by a
/// completed submission is reported as taken on the next availability check.
pub fn build_sandbox_deps(config: &AppConfig) -> RegistrationDeps {
    let code = sandbox_code(config);
    let registry = Arc::new(SandboxRegistry::new(
        config.sandbox_registered_emails.iter().cloned(),
    ));

    info!(
        bank_list = %config.bank_list_path.display(),
        category_list = %config.category_list_path.display(),
        registered = config.sandbox_registered_emails.len(),
        "Wiring sandbox registration dependencies"
    );

    RegistrationDeps {
        identity: Arc::new(SandboxIdentityVerification::new(code, registry.clone())),
        registration_service: Arc::new(SandboxRegistrationService::new(registry)),
        bank_directory: Arc::new(FileBankDirectory::new(config.bank_list_path.clone())),
        category_catalog: Arc::new(FileCategoryCatalog::new(
            config.category_list_path.clone(),
        )),
        event_port: Arc::new(TracingRegistrationEvents),
    }
}

pub fn wire_sandbox_controller(config: &AppConfig) -> RegistrationController {
    RegistrationController::new(build_sandbox_deps(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mo_core::registration::{DraftEdit, RegistrationStep};
    use mo_core::security::SecretString;
    use mo_core::verification::VerificationPhase;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_wired_controller_reads_directory_files() {
        let banks = json_file(r#"[{"name":"Access Bank","code":"044"}]"#);
        let categories = json_file(r#"[{"id":1,"name":"Electronics"}]"#);
        let config = AppConfig {
            bank_list_path: banks.path().to_path_buf(),
            category_list_path: categories.path().to_path_buf(),
            ..AppConfig::empty()
        };
        let controller = wire_sandbox_controller(&config);

        let categories = controller.business_categories().await;
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Electronics");
    }

    #[tokio::test]
    async fn test_wired_controller_uses_default_sandbox_code() {
        let controller = wire_sandbox_controller(&AppConfig::empty());

        controller
            .edit(DraftEdit::Email("ada@lagosfabrics.ng".into()))
            .await
            .unwrap();
        controller
            .edit(DraftEdit::Password(SecretString::from("Str0ng!pass")))
            .await
            .unwrap();
        controller
            .edit(DraftEdit::ConfirmPassword(SecretString::from("Str0ng!pass")))
            .await
            .unwrap();
        let snapshot = controller.advance().await.unwrap();
        assert_eq!(snapshot.current_step, Some(RegistrationStep::EmailVerification));

        let snapshot = controller.verify_code(DEFAULT_SANDBOX_CODE).await.unwrap();
        assert_eq!(snapshot.verification.phase, VerificationPhase::Verified);
    }
}
