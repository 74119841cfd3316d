//! Per-product customs attributes shown in the cross-border packaging grid.
//!
//! # Responsibility
//! - Define the four-attribute projection the grid aggregates per product.
//! - Enforce capture-time value rules (tariff format, description length).
//!
//! # Invariants
//! - Validation runs where attribute values enter the system, never on the
//!   grid read path.

use crate::model::country::CountryCode;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Harmonized-system tariff numbers are plain digit strings, 4 to 11 digits.
static TARIFF_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4,11}$").expect("valid tariff number regex"));

/// Maximum accepted export description length, in characters.
pub const EXPORT_DESCRIPTION_MAX_CHARS: usize = 50;

/// Customs attribute projection for one product.
///
/// Every field is optional: merchants maintain these values only for
/// products that cross customs borders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductCustomsAttributes {
    /// Country the product was manufactured in. Grid rendering falls back
    /// to the shipper country when unset.
    pub country_of_manufacture: Option<CountryCode>,
    /// Dangerous-goods category code, e.g. a lithium-battery class.
    pub dangerous_goods_category: Option<String>,
    /// Harmonized-system tariff number.
    pub tariff_number: Option<String>,
    /// Short goods description for export documents.
    pub export_description: Option<String>,
}

impl ProductCustomsAttributes {
    /// Checks capture-time value rules on every populated field.
    pub fn validate(&self) -> Result<(), CustomsAttributeError> {
        if let Some(tariff) = self.tariff_number.as_deref() {
            if !TARIFF_NUMBER_RE.is_match(tariff) {
                return Err(CustomsAttributeError::InvalidTariffNumber(
                    tariff.to_string(),
                ));
            }
        }

        if let Some(description) = self.export_description.as_deref() {
            let chars = description.chars().count();
            if chars > EXPORT_DESCRIPTION_MAX_CHARS {
                return Err(CustomsAttributeError::ExportDescriptionTooLong {
                    chars,
                    max: EXPORT_DESCRIPTION_MAX_CHARS,
                });
            }
        }

        if let Some(category) = self.dangerous_goods_category.as_deref() {
            if category.trim().is_empty() {
                return Err(CustomsAttributeError::EmptyDangerousGoodsCategory);
            }
        }

        Ok(())
    }
}

/// Capture-time validation errors for customs attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomsAttributeError {
    /// Tariff number is not a 4 to 11 digit string.
    InvalidTariffNumber(String),
    /// Export description exceeds the documented length cap.
    ExportDescriptionTooLong { chars: usize, max: usize },
    /// Dangerous-goods category was set to blank instead of omitted.
    EmptyDangerousGoodsCategory,
}

impl Display for CustomsAttributeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTariffNumber(value) => write!(
                f,
                "tariff number `{value}` is invalid (expected 4 to 11 digits)"
            ),
            Self::ExportDescriptionTooLong { chars, max } => write!(
                f,
                "export description has {chars} characters, maximum is {max}"
            ),
            Self::EmptyDangerousGoodsCategory => {
                write!(f, "dangerous-goods category must not be blank")
            }
        }
    }
}

impl Error for CustomsAttributeError {}

#[cfg(test)]
mod tests {
    use super::{CustomsAttributeError, ProductCustomsAttributes, EXPORT_DESCRIPTION_MAX_CHARS};
    use crate::model::country::CountryCode;

    #[test]
    fn empty_attributes_are_valid() {
        assert!(ProductCustomsAttributes::default().validate().is_ok());
    }

    #[test]
    fn accepts_fully_populated_attributes() {
        let attributes = ProductCustomsAttributes {
            country_of_manufacture: Some(CountryCode::new("CN").unwrap()),
            dangerous_goods_category: Some("01".to_string()),
            tariff_number: Some("85076000".to_string()),
            export_description: Some("lithium-ion battery pack".to_string()),
        };
        assert!(attributes.validate().is_ok());
    }

    #[test]
    fn rejects_non_numeric_and_short_tariff_numbers() {
        for bad in ["85-07", "123", "850760001234"] {
            let attributes = ProductCustomsAttributes {
                tariff_number: Some(bad.to_string()),
                ..ProductCustomsAttributes::default()
            };
            assert!(matches!(
                attributes.validate(),
                Err(CustomsAttributeError::InvalidTariffNumber(_))
            ));
        }
    }

    #[test]
    fn rejects_overlong_export_description() {
        let attributes = ProductCustomsAttributes {
            export_description: Some("x".repeat(EXPORT_DESCRIPTION_MAX_CHARS + 1)),
            ..ProductCustomsAttributes::default()
        };
        assert!(matches!(
            attributes.validate(),
            Err(CustomsAttributeError::ExportDescriptionTooLong { .. })
        ));
    }

    #[test]
    fn rejects_blank_dangerous_goods_category() {
        let attributes = ProductCustomsAttributes {
            dangerous_goods_category: Some("  ".to_string()),
            ..ProductCustomsAttributes::default()
        };
        assert_eq!(
            attributes.validate(),
            Err(CustomsAttributeError::EmptyDangerousGoodsCategory)
        );
    }
}
