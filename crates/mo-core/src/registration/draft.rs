//! The in-progress registration record.

use serde::{Deserialize, Serialize};

use crate::ids::CategoryId;
use crate::registration::directory::{BankEntry, CategoryCatalog};
use crate::registration::field::DraftField;
use crate::security::SecretString;

/// Handle to an uploaded file, as produced by the file storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAttachment {
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: u64,
    /// Opaque storage reference; never interpreted here.
    pub handle: String,
}

#[derive(Debug, Default)]
pub struct CredentialsSection {
    email: String,
    password: SecretString,
    confirm_password: SecretString,
}

impl CredentialsSection {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn confirm_password(&self) -> &SecretString {
        &self.confirm_password
    }
}

/// Business category name plus the id it resolved to, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySelection {
    pub name: String,
    pub id: Option<CategoryId>,
}

/// Settlement bank name plus the code it came with.
///
/// `code` is only ever set by selecting a directory entry; typing a name clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BankSelection {
    pub name: String,
    pub code: Option<String>,
    #[serde(skip)]
    selected: Option<BankEntry>,
}

impl BankSelection {
    /// True when the current name and code are exactly a looked-up directory entry.
    pub fn is_resolved(&self) -> bool {
        match (&self.selected, &self.code) {
            (Some(entry), Some(code)) => entry.name == self.name && &entry.code == code,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct BusinessProfileSection {
    full_name: String,
    business_name: String,
    category: CategorySelection,
    phone_number: String,
    account_number: String,
    bank: BankSelection,
}

impl BusinessProfileSection {
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn business_name(&self) -> &str {
        &self.business_name
    }

    pub fn category(&self) -> &CategorySelection {
        &self.category
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn bank(&self) -> &BankSelection {
        &self.bank
    }
}

#[derive(Debug, Default)]
pub struct BusinessDetailsSection {
    store_name: String,
    business_address: String,
    tax_id: String,
    registration_number: String,
    identity_document: Option<DocumentAttachment>,
    registration_certificate: Option<DocumentAttachment>,
}

impl BusinessDetailsSection {
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    pub fn business_address(&self) -> &str {
        &self.business_address
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }

    pub fn identity_document(&self) -> Option<&DocumentAttachment> {
        self.identity_document.as_ref()
    }

    pub fn registration_certificate(&self) -> Option<&DocumentAttachment> {
        self.registration_certificate.as_ref()
    }
}

/// A single user edit to the draft.
#[derive(Debug)]
pub enum DraftEdit {
    Email(String),
    Password(SecretString),
    ConfirmPassword(SecretString),
    FullName(String),
    BusinessName(String),
    /// Category picked or typed by name; the id is re-resolved on every change.
    BusinessCategory(String),
    PhoneNumber(String),
    AccountNumber(String),
    /// Free-text bank name. Clears any previously selected bank code.
    BankName(String),
    StoreName(String),
    BusinessAddress(String),
    TaxId(String),
    RegistrationNumber(String),
    IdentityDocument(Option<DocumentAttachment>),
    RegistrationCertificate(Option<DocumentAttachment>),
}

impl DraftEdit {
    /// The field this edit writes to.
    pub fn field(&self) -> DraftField {
        match self {
            DraftEdit::Email(_) => DraftField::Email,
            DraftEdit::Password(_) => DraftField::Password,
            DraftEdit::ConfirmPassword(_) => DraftField::ConfirmPassword,
            DraftEdit::FullName(_) => DraftField::FullName,
            DraftEdit::BusinessName(_) => DraftField::BusinessName,
            DraftEdit::BusinessCategory(_) => DraftField::BusinessCategory,
            DraftEdit::PhoneNumber(_) => DraftField::PhoneNumber,
            DraftEdit::AccountNumber(_) => DraftField::AccountNumber,
            DraftEdit::BankName(_) => DraftField::BankName,
            DraftEdit::StoreName(_) => DraftField::StoreName,
            DraftEdit::BusinessAddress(_) => DraftField::BusinessAddress,
            DraftEdit::TaxId(_) => DraftField::TaxId,
            DraftEdit::RegistrationNumber(_) => DraftField::RegistrationNumber,
            DraftEdit::IdentityDocument(_) => DraftField::IdentityDocument,
            DraftEdit::RegistrationCertificate(_) => DraftField::RegistrationCertificate,
        }
    }
}

/// Accumulated user input across all steps.
#[derive(Debug, Default)]
pub struct RegistrationDraft {
    credentials: CredentialsSection,
    profile: BusinessProfileSection,
    details: BusinessDetailsSection,
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(&self) -> &CredentialsSection {
        &self.credentials
    }

    pub fn profile(&self) -> &BusinessProfileSection {
        &self.profile
    }

    pub fn details(&self) -> &BusinessDetailsSection {
        &self.details
    }

    /// Apply one edit. `catalog` is consulted only for category edits.
    pub fn apply(&mut self, edit: DraftEdit, catalog: &CategoryCatalog) {
        match edit {
            DraftEdit::Email(v) => self.credentials.email = v,
            DraftEdit::Password(v) => self.credentials.password = v,
            DraftEdit::ConfirmPassword(v) => self.credentials.confirm_password = v,
            DraftEdit::FullName(v) => self.profile.full_name = v,
            DraftEdit::BusinessName(v) => self.profile.business_name = v,
            DraftEdit::BusinessCategory(name) => {
                let id = catalog.resolve(&name);
                self.profile.category = CategorySelection { name, id };
            }
            DraftEdit::PhoneNumber(v) => self.profile.phone_number = v,
            DraftEdit::AccountNumber(v) => self.profile.account_number = v,
            DraftEdit::BankName(name) => {
                self.profile.bank = BankSelection {
                    name,
                    code: None,
                    selected: None,
                };
            }
            DraftEdit::StoreName(v) => self.details.store_name = v,
            DraftEdit::BusinessAddress(v) => self.details.business_address = v,
            DraftEdit::TaxId(v) => self.details.tax_id = v,
            DraftEdit::RegistrationNumber(v) => self.details.registration_number = v,
            DraftEdit::IdentityDocument(v) => self.details.identity_document = v,
            DraftEdit::RegistrationCertificate(v) => self.details.registration_certificate = v,
        }
    }

    /// Set settlement bank name and code together from a directory entry.
    pub fn select_bank(&mut self, entry: BankEntry) {
        self.profile.bank = BankSelection {
            name: entry.name.clone(),
            code: Some(entry.code.clone()),
            selected: Some(entry),
        };
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            email: self.credentials.email.clone(),
            password_set: !self.credentials.password.is_empty(),
            confirmation_set: !self.credentials.confirm_password.is_empty(),
            full_name: self.profile.full_name.clone(),
            business_name: self.profile.business_name.clone(),
            business_category: self.profile.category.name.clone(),
            business_category_id: self.profile.category.id,
            phone_number: self.profile.phone_number.clone(),
            account_number: self.profile.account_number.clone(),
            bank_name: self.profile.bank.name.clone(),
            bank_code: self.profile.bank.code.clone(),
            store_name: self.details.store_name.clone(),
            business_address: self.details.business_address.clone(),
            tax_id: self.details.tax_id.clone(),
            registration_number: self.details.registration_number.clone(),
            identity_document: self.details.identity_document.clone(),
            registration_certificate: self.details.registration_certificate.clone(),
        }
    }
}

/// Read-only view of the draft handed outside the controller.
///
/// Passwords appear only as presence flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DraftSnapshot {
    pub email: String,
    pub password_set: bool,
    pub confirmation_set: bool,
    pub full_name: String,
    pub business_name: String,
    pub business_category: String,
    pub business_category_id: Option<CategoryId>,
    pub phone_number: String,
    pub account_number: String,
    pub bank_name: String,
    pub bank_code: Option<String>,
    pub store_name: String,
    pub business_address: String,
    pub tax_id: String,
    pub registration_number: String,
    pub identity_document: Option<DocumentAttachment>,
    pub registration_certificate: Option<DocumentAttachment>,
}
