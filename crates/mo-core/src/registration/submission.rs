use crate::ids::CategoryId;
use crate::registration::draft::{DocumentAttachment, RegistrationDraft};
use crate::security::SecretString;

/// Fully resolved payload for the single account-creation call.
///
/// Only buildable from a draft whose category and bank are resolved and whose
/// documents are attached.
#[derive(Debug)]
pub struct RegistrationSubmission {
    pub email: String,
    pub password: SecretString,
    pub full_name: String,
    pub business_name: String,
    pub category_id: CategoryId,
    pub phone_number: String,
    pub account_number: String,
    pub bank_name: String,
    pub bank_code: String,
    pub store_name: String,
    pub business_address: String,
    pub tax_id: Option<String>,
    pub registration_number: Option<String>,
    pub identity_document: DocumentAttachment,
    pub registration_certificate: DocumentAttachment,
}

impl RegistrationSubmission {
    /// `None` if anything the backend needs is still unresolved.
    pub fn from_draft(draft: &RegistrationDraft) -> Option<Self> {
        let credentials = draft.credentials();
        let profile = draft.profile();
        let details = draft.details();

        if !profile.bank().is_resolved() {
            return None;
        }

        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        Some(Self {
            email: credentials.email().trim().to_string(),
            password: SecretString::new(credentials.password().expose().to_string()),
            full_name: profile.full_name().trim().to_string(),
            business_name: profile.business_name().trim().to_string(),
            category_id: profile.category().id?,
            phone_number: profile.phone_number().trim().to_string(),
            account_number: profile.account_number().to_string(),
            bank_name: profile.bank().name.clone(),
            bank_code: profile.bank().code.clone()?,
            store_name: details.store_name().trim().to_string(),
            business_address: details.business_address().trim().to_string(),
            tax_id: optional(details.tax_id()),
            registration_number: optional(details.registration_number()),
            identity_document: details.identity_document()?.clone(),
            registration_certificate: details.registration_certificate()?.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::directory::{BankEntry, BusinessCategory, CategoryCatalog};
    use crate::registration::draft::DraftEdit;

    fn document() -> DocumentAttachment {
        DocumentAttachment {
            file_name: "doc.pdf".into(),
            media_type: "application/pdf".into(),
            size_bytes: 10,
            handle: "h-1".into(),
        }
    }

    #[test]
    fn builds_only_when_bank_category_and_documents_resolve() {
        let catalog = CategoryCatalog::new(vec![BusinessCategory::new(1, "Retail")]);
        let mut draft = RegistrationDraft::new();
        draft.apply(DraftEdit::BusinessCategory("Retail".into()), &catalog);
        draft.apply(DraftEdit::IdentityDocument(Some(document())), &catalog);
        draft.apply(DraftEdit::RegistrationCertificate(Some(document())), &catalog);
        draft.apply(DraftEdit::TaxId("  ".into()), &catalog);
        assert!(RegistrationSubmission::from_draft(&draft).is_none());

        draft.select_bank(BankEntry::new("GTBank", "058"));
        let submission = RegistrationSubmission::from_draft(&draft).unwrap();
        assert_eq!(submission.bank_code, "058");
        assert_eq!(submission.category_id, CategoryId(1));
        assert_eq!(submission.tax_id, None);
    }
}
