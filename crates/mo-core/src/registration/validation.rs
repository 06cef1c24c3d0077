//! Per-step validation rules.
//!
//! Everything here is pure: no I/O, same draft in, same errors out. Whether an
//! email is already registered or a bank code is live is decided elsewhere.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::registration::draft::RegistrationDraft;
use crate::registration::field::{DraftField, FieldErrors};
use crate::registration::step::RegistrationStep;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const ACCOUNT_NUMBER_LEN: usize = 10;
pub const VERIFICATION_CODE_LEN: usize = 5;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static MOBILE_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+234|0)[789][01]\d{8}$").expect("mobile pattern compiles"));

static REGISTRATION_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^RC-?\d{7}$").expect("registration number pattern compiles"));

/// Character classes a password must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordClass {
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl PasswordClass {
    const ALL: [PasswordClass; 4] = [
        PasswordClass::Uppercase,
        PasswordClass::Lowercase,
        PasswordClass::Digit,
        PasswordClass::Symbol,
    ];

    fn is_present_in(self, password: &str) -> bool {
        match self {
            PasswordClass::Uppercase => password.chars().any(char::is_uppercase),
            PasswordClass::Lowercase => password.chars().any(char::is_lowercase),
            PasswordClass::Digit => password.chars().any(|c| c.is_ascii_digit()),
            PasswordClass::Symbol => password
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            PasswordClass::Uppercase => "an uppercase letter",
            PasswordClass::Lowercase => "a lowercase letter",
            PasswordClass::Digit => "a number",
            PasswordClass::Symbol => "a special character",
        }
    }
}

/// Run the rules for `step` against `draft`.
pub fn validate(step: RegistrationStep, draft: &RegistrationDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match step {
        RegistrationStep::Credentials => validate_credentials(draft, &mut errors),
        // Gated by the verification subsystem, not by field format.
        RegistrationStep::EmailVerification => {}
        RegistrationStep::BusinessProfile => validate_business_profile(draft, &mut errors),
        RegistrationStep::BusinessDetails => validate_business_details(draft, &mut errors),
    }
    errors
}

/// Checks run right before the confirmation gate opens.
///
/// Re-runs steps 3 and 4 and adds the checks that step-level validation lets
/// through provisionally: the bank must come from a directory lookup.
pub fn validate_submission(draft: &RegistrationDraft) -> FieldErrors {
    let mut errors = validate(RegistrationStep::BusinessProfile, draft);
    errors.merge(validate(RegistrationStep::BusinessDetails, draft));

    let profile = draft.profile();
    if let Some(message) = account_number_error(profile.account_number()) {
        errors.insert(DraftField::AccountNumber, message);
    }
    if !profile.bank().is_resolved() {
        errors.insert(DraftField::BankName, "Select your bank from the list.");
    }
    if profile.category().id.is_none() {
        errors.insert(
            DraftField::BusinessCategory,
            "Select a business category from the list.",
        );
    }
    let details = draft.details();
    if details.identity_document().is_none() {
        errors.insert(
            DraftField::IdentityDocument,
            "Upload a government-issued identity document.",
        );
    }
    if details.registration_certificate().is_none() {
        errors.insert(
            DraftField::RegistrationCertificate,
            "Upload your business registration certificate.",
        );
    }
    errors
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

pub fn is_valid_verification_code(code: &str) -> bool {
    code.len() == VERIFICATION_CODE_LEN && code.chars().all(|c| c.is_ascii_digit())
}

pub fn missing_password_classes(password: &str) -> Vec<PasswordClass> {
    PasswordClass::ALL
        .into_iter()
        .filter(|class| !class.is_present_in(password))
        .collect()
}

/// "Password must include an uppercase letter and a special character."
///
/// `None` when nothing is missing.
pub fn password_requirement_message(missing: &[PasswordClass]) -> Option<String> {
    let phrases: Vec<&str> = missing.iter().map(|class| class.phrase()).collect();
    let listed = match phrases.as_slice() {
        [] => return None,
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    };
    Some(format!("Password must include {listed}."))
}

/// Inline message shown while a numeric account number is still being typed.
///
/// `None` once exactly 10 digits are present, or when the value is empty or
/// not numeric (those get the hard validation messages instead).
pub fn account_number_progress(value: &str) -> Option<String> {
    let len = value.len();
    let numeric = value.chars().all(|c| c.is_ascii_digit());
    if numeric && len > 0 && len < ACCOUNT_NUMBER_LEN {
        Some(format!(
            "Account number must be {ACCOUNT_NUMBER_LEN} digits ({len} of {ACCOUNT_NUMBER_LEN} entered)."
        ))
    } else {
        None
    }
}

fn account_number_error(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("Account number is required.".to_string());
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Some("Account number must contain digits only.".to_string());
    }
    if value.len() != ACCOUNT_NUMBER_LEN {
        return Some(account_number_progress(value).unwrap_or_else(|| {
            format!("Account number must be exactly {ACCOUNT_NUMBER_LEN} digits.")
        }));
    }
    None
}

fn require(errors: &mut FieldErrors, field: DraftField, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field, message);
        false
    } else {
        true
    }
}

fn validate_credentials(draft: &RegistrationDraft, errors: &mut FieldErrors) {
    let credentials = draft.credentials();

    if require(errors, DraftField::Email, credentials.email(), "Email is required.")
        && !is_valid_email(credentials.email())
    {
        errors.insert(DraftField::Email, "Enter a valid email address.");
    }

    let password = credentials.password().expose();
    if password.is_empty() {
        errors.insert(DraftField::Password, "Password is required.");
    } else if let Some(message) = password_requirement_message(&missing_password_classes(password))
    {
        errors.insert(DraftField::Password, message);
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            DraftField::Password,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters."),
        );
    }

    let confirmation = credentials.confirm_password();
    if confirmation.is_empty() {
        errors.insert(DraftField::ConfirmPassword, "Confirm your password.");
    } else if !confirmation.matches(credentials.password()) {
        errors.insert(DraftField::ConfirmPassword, "Passwords do not match.");
    }
}

fn validate_business_profile(draft: &RegistrationDraft, errors: &mut FieldErrors) {
    let profile = draft.profile();

    require(
        errors,
        DraftField::FullName,
        profile.full_name(),
        "Full name is required.",
    );
    require(
        errors,
        DraftField::BusinessName,
        profile.business_name(),
        "Business name is required.",
    );
    if require(
        errors,
        DraftField::BusinessCategory,
        &profile.category().name,
        "Business category is required.",
    ) && profile.category().id.is_none()
    {
        errors.insert(
            DraftField::BusinessCategory,
            "Select a business category from the list.",
        );
    }
    if require(
        errors,
        DraftField::PhoneNumber,
        profile.phone_number(),
        "Phone number is required.",
    ) && !MOBILE_NUMBER_PATTERN.is_match(profile.phone_number().trim())
    {
        errors.insert(
            DraftField::PhoneNumber,
            "Enter a valid mobile number, e.g. 08012345678.",
        );
    }
    if let Some(message) = account_number_error(profile.account_number()) {
        errors.insert(DraftField::AccountNumber, message);
    }
    // Free text is accepted here; submission insists on a directory entry.
    require(
        errors,
        DraftField::BankName,
        &profile.bank().name,
        "Bank name is required.",
    );
}

fn validate_business_details(draft: &RegistrationDraft, errors: &mut FieldErrors) {
    let details = draft.details();

    require(
        errors,
        DraftField::StoreName,
        details.store_name(),
        "Store name is required.",
    );
    require(
        errors,
        DraftField::BusinessAddress,
        details.business_address(),
        "Business address is required.",
    );

    let registration_number = details.registration_number().trim();
    if !registration_number.is_empty() && !REGISTRATION_NUMBER_PATTERN.is_match(registration_number)
    {
        errors.insert(
            DraftField::RegistrationNumber,
            "Registration number must look like RC1234567 or RC-1234567.",
        );
    }

    let tax_id = details.tax_id().trim();
    if !tax_id.is_empty() {
        if !tax_id.chars().all(|c| c.is_ascii_digit() || c == '-') {
            errors.insert(
                DraftField::TaxId,
                "Tax ID may contain only digits and hyphens.",
            );
        } else {
            let digits = tax_id.chars().filter(char::is_ascii_digit).count();
            if digits != 10 && digits != 12 {
                errors.insert(
                    DraftField::TaxId,
                    "Tax ID must contain exactly 10 or 12 digits.",
                );
            }
        }
    }

    if details.identity_document().is_none() {
        errors.insert(
            DraftField::IdentityDocument,
            "Upload a government-issued identity document.",
        );
    }
    if details.registration_certificate().is_none() {
        errors.insert(
            DraftField::RegistrationCertificate,
            "Upload your business registration certificate.",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::CategoryId;
    use crate::registration::directory::{BankEntry, BusinessCategory, CategoryCatalog};
    use crate::registration::draft::{DocumentAttachment, DraftEdit};

    fn catalog() -> CategoryCatalog {
        CategoryCatalog::new(vec![BusinessCategory::new(12, "Groceries")])
    }

    fn document(name: &str) -> DocumentAttachment {
        DocumentAttachment {
            file_name: name.to_string(),
            media_type: "application/pdf".to_string(),
            size_bytes: 2048,
            handle: format!("uploads/{name}"),
        }
    }

    fn draft_with(edits: Vec<DraftEdit>) -> RegistrationDraft {
        let mut draft = RegistrationDraft::new();
        let catalog = catalog();
        for edit in edits {
            draft.apply(edit, &catalog);
        }
        draft
    }

    fn credentials(email: &str, password: &str, confirm: &str) -> RegistrationDraft {
        draft_with(vec![
            DraftEdit::Email(email.into()),
            DraftEdit::Password(password.into()),
            DraftEdit::ConfirmPassword(confirm.into()),
        ])
    }

    fn complete_profile(account_number: &str) -> RegistrationDraft {
        let mut draft = draft_with(vec![
            DraftEdit::FullName("Ada Obi".into()),
            DraftEdit::BusinessName("Ada Foods".into()),
            DraftEdit::BusinessCategory("Groceries".into()),
            DraftEdit::PhoneNumber("08031234567".into()),
            DraftEdit::AccountNumber(account_number.into()),
        ]);
        draft.select_bank(BankEntry::new("Zenith Bank", "057"));
        draft
    }

    fn complete_details(tax_id: &str, registration_number: &str) -> RegistrationDraft {
        draft_with(vec![
            DraftEdit::StoreName("Ada's Pantry".into()),
            DraftEdit::BusinessAddress("12 Marina, Lagos".into()),
            DraftEdit::TaxId(tax_id.into()),
            DraftEdit::RegistrationNumber(registration_number.into()),
            DraftEdit::IdentityDocument(Some(document("id.pdf"))),
            DraftEdit::RegistrationCertificate(Some(document("cac.pdf"))),
        ])
    }

    #[test]
    fn valid_credentials_produce_no_errors() {
        let draft = credentials("a@b.com", "Abcdef1!", "Abcdef1!");
        assert!(validate(RegistrationStep::Credentials, &draft).is_empty());
    }

    #[test]
    fn empty_credentials_report_every_required_field() {
        let errors = validate(RegistrationStep::Credentials, &RegistrationDraft::new());
        assert_eq!(errors.get(&DraftField::Email), Some("Email is required."));
        assert_eq!(errors.get(&DraftField::Password), Some("Password is required."));
        assert_eq!(
            errors.get(&DraftField::ConfirmPassword),
            Some("Confirm your password.")
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["plainaddress", "a@b", "a b@c.com", "@b.com"] {
            let draft = credentials(email, "Abcdef1!", "Abcdef1!");
            let errors = validate(RegistrationStep::Credentials, &draft);
            assert_eq!(
                errors.get(&DraftField::Email),
                Some("Enter a valid email address."),
                "{email}"
            );
        }
    }

    #[test]
    fn password_missing_one_class_names_exactly_that_class() {
        let cases = [
            ("abcdef1!", "Password must include an uppercase letter."),
            ("ABCDEF1!", "Password must include a lowercase letter."),
            ("Abcdefg!", "Password must include a number."),
            ("Abcdefg1", "Password must include a special character."),
        ];
        for (password, expected) in cases {
            let draft = credentials("a@b.com", password, password);
            let errors = validate(RegistrationStep::Credentials, &draft);
            assert_eq!(errors.get(&DraftField::Password), Some(expected), "{password}");
        }
    }

    #[test]
    fn password_missing_several_classes_lists_only_missing_ones() {
        let draft = credentials("a@b.com", "abcdefg1", "abcdefg1");
        let errors = validate(RegistrationStep::Credentials, &draft);
        assert_eq!(
            errors.get(&DraftField::Password),
            Some("Password must include an uppercase letter and a special character.")
        );

        let draft = credentials("a@b.com", "abcdefgh", "abcdefgh");
        let errors = validate(RegistrationStep::Credentials, &draft);
        assert_eq!(
            errors.get(&DraftField::Password),
            Some("Password must include an uppercase letter, a number and a special character.")
        );
    }

    #[test]
    fn short_password_with_all_classes_reports_length() {
        let draft = credentials("a@b.com", "Ab1!", "Ab1!");
        let errors = validate(RegistrationStep::Credentials, &draft);
        assert_eq!(
            errors.get(&DraftField::Password),
            Some("Password must be at least 8 characters.")
        );
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let draft = credentials("a@b.com", "Abcdef1!", "Abcdef1?");
        let errors = validate(RegistrationStep::Credentials, &draft);
        assert_eq!(
            errors.get(&DraftField::ConfirmPassword),
            Some("Passwords do not match.")
        );
        assert!(!errors.contains(&DraftField::Password));
    }

    #[test]
    fn verification_step_has_no_field_rules() {
        let draft = RegistrationDraft::new();
        assert!(validate(RegistrationStep::EmailVerification, &draft).is_empty());
    }

    #[test]
    fn five_digit_account_number_is_an_in_progress_error() {
        let draft = complete_profile("12345");
        let errors = validate(RegistrationStep::BusinessProfile, &draft);
        assert_eq!(
            errors.get(&DraftField::AccountNumber),
            Some("Account number must be 10 digits (5 of 10 entered).")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn ten_digit_account_number_with_selected_bank_passes() {
        let draft = complete_profile("1234567890");
        assert!(validate(RegistrationStep::BusinessProfile, &draft).is_empty());
    }

    #[test]
    fn account_number_rejects_letters_and_overflow() {
        let errors = validate(RegistrationStep::BusinessProfile, &complete_profile("12345abcde"));
        assert_eq!(
            errors.get(&DraftField::AccountNumber),
            Some("Account number must contain digits only.")
        );

        let errors = validate(RegistrationStep::BusinessProfile, &complete_profile("12345678901"));
        assert_eq!(
            errors.get(&DraftField::AccountNumber),
            Some("Account number must be exactly 10 digits.")
        );
    }

    #[test]
    fn phone_number_must_be_national_mobile() {
        let mut draft = complete_profile("1234567890");
        draft.apply(DraftEdit::PhoneNumber("+2348031234567".into()), &catalog());
        assert!(validate(RegistrationStep::BusinessProfile, &draft).is_empty());

        draft.apply(DraftEdit::PhoneNumber("0123".into()), &catalog());
        let errors = validate(RegistrationStep::BusinessProfile, &draft);
        assert!(errors.contains(&DraftField::PhoneNumber));
    }

    #[test]
    fn unresolved_category_is_rejected() {
        let mut draft = complete_profile("1234567890");
        draft.apply(DraftEdit::BusinessCategory("Grocery".into()), &catalog());
        assert_eq!(draft.profile().category().id, None);

        let errors = validate(RegistrationStep::BusinessProfile, &draft);
        assert_eq!(
            errors.get(&DraftField::BusinessCategory),
            Some("Select a business category from the list.")
        );

        draft.apply(DraftEdit::BusinessCategory("Groceries".into()), &catalog());
        assert_eq!(draft.profile().category().id, Some(CategoryId(12)));
    }

    #[test]
    fn free_text_bank_passes_step_but_fails_submission() {
        let mut draft = complete_profile("1234567890");
        draft.apply(DraftEdit::BankName("Zenith".into()), &catalog());
        assert!(validate(RegistrationStep::BusinessProfile, &draft).is_empty());

        let errors = validate_submission(&draft);
        assert_eq!(
            errors.get(&DraftField::BankName),
            Some("Select your bank from the list.")
        );
    }

    #[test]
    fn hyphenated_ten_digit_tax_id_passes() {
        let draft = complete_details("12-345-678-9", "");
        assert!(validate(RegistrationStep::BusinessDetails, &draft).is_empty());
    }

    #[test]
    fn twelve_digit_tax_id_passes() {
        let draft = complete_details("123456789012", "");
        assert!(validate(RegistrationStep::BusinessDetails, &draft).is_empty());
    }

    #[test]
    fn nine_digit_tax_id_fails_with_exact_count_message() {
        let draft = complete_details("123456789", "");
        let errors = validate(RegistrationStep::BusinessDetails, &draft);
        assert_eq!(
            errors.get(&DraftField::TaxId),
            Some("Tax ID must contain exactly 10 or 12 digits.")
        );
    }

    #[test]
    fn tax_id_rejects_other_characters() {
        let draft = complete_details("12 345 678 90", "");
        let errors = validate(RegistrationStep::BusinessDetails, &draft);
        assert_eq!(
            errors.get(&DraftField::TaxId),
            Some("Tax ID may contain only digits and hyphens.")
        );
    }

    #[test]
    fn registration_number_pattern() {
        for ok in ["RC1234567", "RC-1234567"] {
            let draft = complete_details("", ok);
            assert!(validate(RegistrationStep::BusinessDetails, &draft).is_empty(), "{ok}");
        }
        for bad in ["RC123456", "rc1234567", "BN-1234567", "RC--1234567"] {
            let draft = complete_details("", bad);
            let errors = validate(RegistrationStep::BusinessDetails, &draft);
            assert!(errors.contains(&DraftField::RegistrationNumber), "{bad}");
        }
    }

    #[test]
    fn documents_are_required() {
        let draft = draft_with(vec![
            DraftEdit::StoreName("Shop".into()),
            DraftEdit::BusinessAddress("Somewhere".into()),
        ]);
        let errors = validate(RegistrationStep::BusinessDetails, &draft);
        assert!(errors.contains(&DraftField::IdentityDocument));
        assert!(errors.contains(&DraftField::RegistrationCertificate));
    }

    #[test]
    fn empty_required_field_in_each_step_is_reported() {
        let cases = [
            (RegistrationStep::Credentials, DraftField::Email),
            (RegistrationStep::BusinessProfile, DraftField::FullName),
            (RegistrationStep::BusinessProfile, DraftField::AccountNumber),
            (RegistrationStep::BusinessDetails, DraftField::StoreName),
            (RegistrationStep::BusinessDetails, DraftField::BusinessAddress),
        ];
        for (step, field) in cases {
            let errors = validate(step, &RegistrationDraft::new());
            assert!(errors.contains(&field), "{step} {field}");
        }
    }

    #[test]
    fn progress_message_only_for_partial_numeric_input() {
        assert_eq!(
            account_number_progress("123"),
            Some("Account number must be 10 digits (3 of 10 entered).".to_string())
        );
        assert_eq!(account_number_progress(""), None);
        assert_eq!(account_number_progress("1234567890"), None);
        assert_eq!(account_number_progress("12a"), None);
    }

    #[test]
    fn verification_code_must_be_five_digits() {
        assert!(is_valid_verification_code("12345"));
        assert!(!is_valid_verification_code("1234"));
        assert!(!is_valid_verification_code("123456"));
        assert!(!is_valid_verification_code("12a45"));
    }
}
