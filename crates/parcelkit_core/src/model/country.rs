//! Validated ISO-3166-1 alpha-2 country code.
//!
//! # Responsibility
//! - Provide one normalized country representation for routing rules,
//!   customs attributes and catalog options.
//!
//! # Invariants
//! - Stored form is always two uppercase ASCII letters.
//! - Serde round-trips as a plain string and re-validates on deserialize.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Two-letter country code, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parses and normalizes a country code.
    ///
    /// Accepts surrounding whitespace and lowercase input; anything that is
    /// not exactly two ASCII letters is rejected.
    pub fn new(value: impl AsRef<str>) -> Result<Self, CountryCodeError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CountryCodeError::Empty);
        }
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CountryCodeError::Invalid(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the normalized two-letter form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for CountryCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

/// Country code parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    /// Input was empty or whitespace only.
    Empty,
    /// Input is not two ASCII letters.
    Invalid(String),
}

impl Display for CountryCodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "country code must not be empty"),
            Self::Invalid(value) => write!(
                f,
                "country code `{value}` is invalid (expected two ASCII letters)"
            ),
        }
    }
}

impl Error for CountryCodeError {}
