//! Sandbox walkthrough of the merchant registration flow.
//!
//! Usage: `merchant-onboarding [CONFIG_PATH]`. Falls back to
//! `MERCHANT_ONBOARDING_CONFIG`, then to the files under `data/`.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use merchant_onboarding_lib::bootstrap::wiring::{build_sandbox_deps, sandbox_code};
use merchant_onboarding_lib::{init_tracing_subscriber, load_config};
use mo_app::RegistrationController;
use mo_core::config::AppConfig;
use mo_core::registration::{DocumentAttachment, DraftEdit, RegistrationSnapshot};
use mo_core::security::SecretString;

const CONFIG_ENV: &str = "MERCHANT_ONBOARDING_CONFIG";

fn resolve_config() -> anyhow::Result<AppConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .map(PathBuf::from);

    match path {
        Some(path) => load_config(path),
        None => Ok(AppConfig::with_data_dir(PathBuf::from("data"))),
    }
}

fn print_snapshot(label: &str, snapshot: &RegistrationSnapshot) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("Failed to render snapshot")?;
    println!("== {label} ==\n{json}");
    Ok(())
}

fn document(file_name: &str) -> DocumentAttachment {
    DocumentAttachment {
        file_name: file_name.to_string(),
        media_type: "application/pdf".to_string(),
        size_bytes: 52_400,
        handle: format!("sandbox/{file_name}"),
    }
}

async fn apply_all(
    controller: &RegistrationController,
    edits: Vec<DraftEdit>,
) -> anyhow::Result<()> {
    for edit in edits {
        controller.edit(edit).await?;
    }
    Ok(())
}

async fn run(controller: &RegistrationController, code: &str) -> anyhow::Result<()> {
    apply_all(
        controller,
        vec![
            DraftEdit::Email("ada@lagosfabrics.ng".into()),
            DraftEdit::Password(SecretString::from("Str0ng!pass")),
            DraftEdit::ConfirmPassword(SecretString::from("Str0ng!pass")),
        ],
    )
    .await?;
    print_snapshot("code sent", &controller.advance().await?)?;

    print_snapshot("code verified", &controller.verify_code(code).await?)?;
    controller.advance().await?;

    let categories = controller.business_categories().await;
    let category = categories
        .first()
        .map(|category| category.name.clone())
        .unwrap_or_default();
    apply_all(
        controller,
        vec![
            DraftEdit::FullName("Ada Obi".into()),
            DraftEdit::BusinessName("Lagos Fabrics".into()),
            DraftEdit::BusinessCategory(category),
            DraftEdit::PhoneNumber("08031234567".into()),
            DraftEdit::AccountNumber("0123456789".into()),
        ],
    )
    .await?;

    let banks = controller.search_banks("bank").await?;
    if let Some(bank) = banks.first() {
        info!(bank = %bank.name, "Selecting settlement bank");
        controller.select_bank(&bank.code).await?;
    }
    print_snapshot("business profile", &controller.advance().await?)?;

    apply_all(
        controller,
        vec![
            DraftEdit::StoreName("Ada's Fabrics".into()),
            DraftEdit::BusinessAddress("12 Broad Street, Lagos".into()),
            DraftEdit::RegistrationNumber("RC-1234567".into()),
            DraftEdit::IdentityDocument(Some(document("passport.pdf"))),
            DraftEdit::RegistrationCertificate(Some(document("cac-certificate.pdf"))),
        ],
    )
    .await?;

    let snapshot = controller.submit().await?;
    print_snapshot("confirmation", &snapshot)?;
    if snapshot.gate.is_some() {
        print_snapshot("submitted", &controller.confirm_submit().await?)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = resolve_config()?;
    init_tracing_subscriber(&config)?;

    let code = sandbox_code(&config);
    info!("Starting sandbox registration walkthrough");

    let controller = RegistrationController::new(build_sandbox_deps(&config));
    run(&controller, &code).await
}
