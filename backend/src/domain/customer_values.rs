//! Validated value types composing the customer aggregate.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use result_pipeline::{Outcome, ResultError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum number of characters in a first or last name.
pub const PERSON_NAME_MAX: usize = 128;

/// Validation failures raised while constructing customer values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomerValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A text field exceeded its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum allowed characters.
        max: usize,
    },
    /// The email address is malformed.
    #[error("'{value}' is not a valid email address")]
    InvalidEmail {
        /// Rejected input.
        value: String,
    },
    /// The customer number does not follow `{prefix}-{year}-{sequence}`.
    #[error("'{value}' is not a valid customer number")]
    InvalidCustomerNumber {
        /// Rejected input.
        value: String,
    },
    /// An identifier was not a UUID.
    #[error("'{value}' is not a valid {field}")]
    InvalidId {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected input.
        value: String,
    },
    /// The birth date lies in the future.
    #[error("birth date must not be in the future")]
    BirthDateInFuture,
}

impl CustomerValidationError {
    /// Input field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::TooLong { field, .. } | Self::InvalidId { field, .. } => {
                *field
            }
            Self::InvalidEmail { .. } => "email",
            Self::InvalidCustomerNumber { .. } => "number",
            Self::BirthDateInFuture => "birth_date",
        }
    }
}

impl From<CustomerValidationError> for ResultError {
    fn from(error: CustomerValidationError) -> Self {
        Self::invalid_field(error.field(), error.to_string())
    }
}

/// Lift a value constructor into a pipeline step.
pub fn validated<T>(result: Result<T, CustomerValidationError>) -> Outcome<T> {
    match result {
        Ok(value) => Outcome::success(value),
        Err(error) => Outcome::failure_with(error),
    }
}

/// Stable customer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CustomerId {
    type Err = CustomerValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| CustomerValidationError::InvalidId {
                field: "id",
                value: value.to_owned(),
            })
    }
}

/// First or last name of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name for `field`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Fails when the trimmed name is empty or longer than
    /// [`PERSON_NAME_MAX`] characters.
    pub fn new(field: &'static str, value: impl AsRef<str>) -> Result<Self, CustomerValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CustomerValidationError::Empty { field });
        }
        if trimmed.chars().count() > PERSON_NAME_MAX {
            return Err(CustomerValidationError::TooLong {
                field,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Lower-cased, syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an email address.
    ///
    /// # Errors
    ///
    /// Fails when the address is blank or malformed.
    pub fn new(value: impl AsRef<str>) -> Result<Self, CustomerValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(CustomerValidationError::Empty { field: "email" });
        }
        if !email_regex().is_match(&normalised) {
            return Err(CustomerValidationError::InvalidEmail {
                value: value.as_ref().to_owned(),
            });
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-facing customer number such as `CUS-2026-100000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerNumber {
    prefix: String,
    year: i32,
    sequence: u64,
}

impl CustomerNumber {
    /// Build a number from its parts.
    ///
    /// # Errors
    ///
    /// Fails when the prefix is blank or contains anything but ASCII
    /// letters.
    pub fn new(
        prefix: impl AsRef<str>,
        year: i32,
        sequence: u64,
    ) -> Result<Self, CustomerValidationError> {
        let prefix = prefix.as_ref().trim();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CustomerValidationError::InvalidCustomerNumber {
                value: format!("{prefix}-{year}-{sequence}"),
            });
        }
        Ok(Self {
            prefix: prefix.to_ascii_uppercase(),
            year,
            sequence,
        })
    }

    /// Alphabetic prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Year the number was issued.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Sequence part of the number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl fmt::Display for CustomerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.prefix, self.year, self.sequence)
    }
}

impl FromStr for CustomerNumber {
    type Err = CustomerValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || CustomerValidationError::InvalidCustomerNumber {
            value: value.to_owned(),
        };
        let mut parts = value.trim().splitn(3, '-');
        let (Some(prefix), Some(year), Some(sequence)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let year = year.parse().map_err(|_| invalid())?;
        let sequence = sequence.parse().map_err(|_| invalid())?;
        Self::new(prefix, year, sequence).map_err(|_| invalid())
    }
}

impl TryFrom<String> for CustomerNumber {
    type Error = CustomerValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CustomerNumber> for String {
    fn from(value: CustomerNumber) -> Self {
        value.to_string()
    }
}

/// Identifier of an address within a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressId(Uuid);

impl AddressId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AddressId {
    type Err = CustomerValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| CustomerValidationError::InvalidId {
                field: "address_id",
                value: value.to_owned(),
            })
    }
}

/// Unvalidated address input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDraft {
    /// Addressee or label.
    pub name: String,
    /// First street line.
    pub line1: String,
    /// Optional second street line.
    #[serde(default)]
    pub line2: Option<String>,
    /// Postal code.
    pub postal_code: String,
    /// City.
    pub city: String,
    /// Country name or code.
    pub country: String,
    /// Whether this is the customer's primary address.
    #[serde(default)]
    pub is_primary: bool,
}

/// Postal address attached to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    id: AddressId,
    name: String,
    line1: String,
    line2: Option<String>,
    postal_code: String,
    city: String,
    country: String,
    is_primary: bool,
}

fn required(field: &'static str, value: &str) -> Result<String, CustomerValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CustomerValidationError::Empty { field })
    } else {
        Ok(trimmed.to_owned())
    }
}

impl Address {
    /// Validate a draft into an address with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Fails when any of name, line1, postal code, city, or country is blank.
    pub fn new(draft: AddressDraft) -> Result<Self, CustomerValidationError> {
        Ok(Self {
            id: AddressId::random(),
            name: required("address.name", &draft.name)?,
            line1: required("address.line1", &draft.line1)?,
            line2: draft
                .line2
                .map(|line| line.trim().to_owned())
                .filter(|line| !line.is_empty()),
            postal_code: required("address.postal_code", &draft.postal_code)?,
            city: required("address.city", &draft.city)?,
            country: required("address.country", &draft.country)?,
            is_primary: draft.is_primary,
        })
    }

    /// Address identifier.
    #[must_use]
    pub const fn id(&self) -> AddressId {
        self.id
    }

    /// Addressee or label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First street line.
    #[must_use]
    pub fn line1(&self) -> &str {
        &self.line1
    }

    /// Second street line.
    #[must_use]
    pub fn line2(&self) -> Option<&str> {
        self.line2.as_deref()
    }

    /// Postal code.
    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    /// City.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Country.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Whether this is the primary address.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub(crate) fn set_primary(&mut self, primary: bool) {
        self.is_primary = primary;
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for customer value types.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", CustomerValidationError::Empty { field: "first_name" })]
    #[case("   ", CustomerValidationError::Empty { field: "first_name" })]
    fn blank_names_are_rejected(#[case] input: &str, #[case] expected: CustomerValidationError) {
        assert_eq!(PersonName::new("first_name", input), Err(expected));
    }

    #[test]
    fn long_names_are_rejected() {
        let input = "x".repeat(PERSON_NAME_MAX + 1);
        let error = PersonName::new("last_name", input).expect_err("too long");
        assert_eq!(error.field(), "last_name");
    }

    #[test]
    fn names_are_trimmed() {
        let name = PersonName::new("first_name", "  John ").expect("valid name");
        assert_eq!(name.as_str(), "John");
    }

    #[rstest]
    #[case("John.Doe@Example.com", "john.doe@example.com")]
    #[case(" ada@lovelace.org ", "ada@lovelace.org")]
    fn emails_are_normalised(#[case] input: &str, #[case] expected: &str) {
        let email = EmailAddress::new(input).expect("valid email");
        assert_eq!(email.as_str(), expected);
    }

    #[rstest]
    #[case("john.doe")]
    #[case("john@doe")]
    #[case("john doe@example.com")]
    fn malformed_emails_are_rejected(#[case] input: &str) {
        let error = EmailAddress::new(input).expect_err("invalid email");
        assert_eq!(error.field(), "email");
    }

    #[test]
    fn customer_numbers_parse_and_render() {
        let number: CustomerNumber = "cus-2026-100042".parse().expect("valid number");
        assert_eq!(number.prefix(), "CUS");
        assert_eq!(number.year(), 2026);
        assert_eq!(number.sequence(), 100_042);
        assert_eq!(number.to_string(), "CUS-2026-100042");
    }

    #[rstest]
    #[case("CUS-2026")]
    #[case("CUS-year-1")]
    #[case("C1S-2026-1")]
    fn malformed_customer_numbers_are_rejected(#[case] input: &str) {
        assert!(input.parse::<CustomerNumber>().is_err());
    }

    #[test]
    fn address_requires_core_fields() {
        let draft = AddressDraft {
            name: "Home".to_owned(),
            line1: "Main Street 1".to_owned(),
            line2: Some("  ".to_owned()),
            postal_code: "1234".to_owned(),
            city: String::new(),
            country: "NL".to_owned(),
            is_primary: true,
        };
        let error = Address::new(draft.clone()).expect_err("city missing");
        assert_eq!(error.field(), "address.city");

        let address = Address::new(AddressDraft {
            city: "Amsterdam".to_owned(),
            ..draft
        })
        .expect("valid address");
        assert_eq!(address.line2(), None);
        assert!(address.is_primary());
    }

    #[test]
    fn validation_errors_convert_into_field_errors() {
        let outcome = validated(EmailAddress::new("nope"));
        let error = outcome.errors().first().expect("validation error");
        assert_eq!(error.field(), Some("email"));
    }
}
