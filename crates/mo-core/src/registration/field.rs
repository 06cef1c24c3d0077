//! Typed draft field names and the draft-wide error map.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Every field the registration draft collects, plus an explicit bucket for
/// names the backend reports that this client does not know.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DraftField {
    Email,
    Password,
    ConfirmPassword,
    VerificationCode,
    FullName,
    BusinessName,
    BusinessCategory,
    PhoneNumber,
    AccountNumber,
    BankName,
    StoreName,
    BusinessAddress,
    TaxId,
    RegistrationNumber,
    IdentityDocument,
    RegistrationCertificate,
    Unrecognized(String),
}

impl DraftField {
    /// Parse a backend field key. Aliases the registration API is known to use
    /// for the same input collapse onto one variant.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "email" => DraftField::Email,
            "password" => DraftField::Password,
            "confirmPassword" | "passwordConfirmation" => DraftField::ConfirmPassword,
            "verificationCode" | "otp" => DraftField::VerificationCode,
            "fullName" => DraftField::FullName,
            "businessName" => DraftField::BusinessName,
            "businessCategory" | "categoryId" => DraftField::BusinessCategory,
            "phoneNumber" => DraftField::PhoneNumber,
            "accountNumber" => DraftField::AccountNumber,
            "bankName" | "bankCode" => DraftField::BankName,
            "storeName" => DraftField::StoreName,
            "businessAddress" => DraftField::BusinessAddress,
            "taxId" => DraftField::TaxId,
            "registrationNumber" | "rcNumber" => DraftField::RegistrationNumber,
            "identityDocument" => DraftField::IdentityDocument,
            "registrationCertificate" => DraftField::RegistrationCertificate,
            other => DraftField::Unrecognized(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            DraftField::Email => "email",
            DraftField::Password => "password",
            DraftField::ConfirmPassword => "confirmPassword",
            DraftField::VerificationCode => "verificationCode",
            DraftField::FullName => "fullName",
            DraftField::BusinessName => "businessName",
            DraftField::BusinessCategory => "businessCategory",
            DraftField::PhoneNumber => "phoneNumber",
            DraftField::AccountNumber => "accountNumber",
            DraftField::BankName => "bankName",
            DraftField::StoreName => "storeName",
            DraftField::BusinessAddress => "businessAddress",
            DraftField::TaxId => "taxId",
            DraftField::RegistrationNumber => "registrationNumber",
            DraftField::IdentityDocument => "identityDocument",
            DraftField::RegistrationCertificate => "registrationCertificate",
            DraftField::Unrecognized(name) => name,
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for DraftField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

/// Field-keyed error messages. At most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<DraftField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a backend payload keyed by wire names.
    pub fn from_wire<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (DraftField::from_wire(k.as_ref()), v.into()))
                .collect(),
        )
    }

    /// Record an error, keeping the first message if the field already has one.
    pub fn insert(&mut self, field: DraftField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Record an error, replacing any existing message.
    pub fn set(&mut self, field: DraftField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn clear(&mut self, field: &DraftField) -> Option<String> {
        self.0.remove(field)
    }

    pub fn clear_all(&mut self) {
        self.0.clear();
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&DraftField) -> bool) {
        self.0.retain(|field, _| keep(field));
    }

    /// Merge `other` into `self`; incoming messages win.
    pub fn merge(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn get(&self, field: &DraftField) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &DraftField) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &DraftField> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DraftField, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }
}

impl FromIterator<(DraftField, String)> for FieldErrors {
    fn from_iter<T: IntoIterator<Item = (DraftField, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_aliases_collapse_onto_one_field() {
        assert_eq!(DraftField::from_wire("categoryId"), DraftField::BusinessCategory);
        assert_eq!(DraftField::from_wire("bankCode"), DraftField::BankName);
        assert_eq!(
            DraftField::from_wire("referralCode"),
            DraftField::Unrecognized("referralCode".to_string())
        );
    }

    #[test]
    fn insert_keeps_first_message_and_set_replaces() {
        let mut errors = FieldErrors::new();
        errors.insert(DraftField::Email, "first");
        errors.insert(DraftField::Email, "second");
        assert_eq!(errors.get(&DraftField::Email), Some("first"));

        errors.set(DraftField::Email, "third");
        assert_eq!(errors.get(&DraftField::Email), Some("third"));
    }

    #[test]
    fn from_wire_builds_typed_map() {
        let errors = FieldErrors::from_wire([
            ("taxId", "Tax ID already in use"),
            ("unknownThing", "bad"),
        ]);
        assert_eq!(errors.get(&DraftField::TaxId), Some("Tax ID already in use"));
        assert!(errors.contains(&DraftField::Unrecognized("unknownThing".to_string())));
    }

    #[test]
    fn serializes_with_wire_keys() {
        let mut errors = FieldErrors::new();
        errors.set(DraftField::AccountNumber, "Account number must be exactly 10 digits.");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json["accountNumber"],
            "Account number must be exactly 10 digits."
        );
    }
}
