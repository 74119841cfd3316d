//! Shipping-info value object persisted per order address.
//!
//! # Responsibility
//! - Model carrier service selections and the optional customs declaration.
//! - Own the JSON contract used by the storage column.
//!
//! # Invariants
//! - `to_json`/`from_json` are the only codec for the storage column.
//! - Unknown JSON fields are tolerated on read so older rows survive
//!   contract growth.
//!
//! # See also
//! - `crate::repo::address_extension_repo` for the column this feeds.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One selected carrier service, e.g. preferred day or bulky goods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceSelection {
    /// Service code as defined by module configuration.
    pub code: String,
    /// Service-specific inputs, keyed by input name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl ServiceSelection {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Customs declaration captured for cross-border shipments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomsDeclaration {
    pub export_type: Option<String>,
    pub terms_of_trade: Option<String>,
    pub place_of_committal: Option<String>,
    pub additional_fee: Option<f64>,
    pub permit_number: Option<String>,
    pub attestation_number: Option<String>,
    pub electronic_export_notification: bool,
}

/// Aggregate persisted as one JSON document per order address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingInfo {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceSelection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customs: Option<CustomsDeclaration>,
}

impl ShippingInfo {
    /// Encodes the aggregate for the storage column.
    pub fn to_json(&self) -> Result<String, ShippingInfoError> {
        serde_json::to_string(self).map_err(|err| ShippingInfoError::EncodeFailed(err.to_string()))
    }

    /// Decodes a storage column value. Fields this version does not know
    /// are ignored rather than rejected.
    pub fn from_json(raw: &str) -> Result<Self, ShippingInfoError> {
        serde_json::from_str(raw).map_err(|err| ShippingInfoError::DecodeFailed(err.to_string()))
    }

    /// Checks structural rules before the aggregate is persisted.
    pub fn validate(&self) -> Result<(), ShippingInfoError> {
        let mut seen = BTreeSet::new();
        for selection in &self.services {
            if selection.code.trim().is_empty() {
                return Err(ShippingInfoError::EmptyServiceCode);
            }
            if !seen.insert(selection.code.as_str()) {
                return Err(ShippingInfoError::DuplicateServiceCode(
                    selection.code.clone(),
                ));
            }
        }

        if let Some(customs) = &self.customs {
            if let Some(fee) = customs.additional_fee {
                if fee < 0.0 {
                    return Err(ShippingInfoError::NegativeAdditionalFee(fee));
                }
            }
        }

        Ok(())
    }
}

/// Codec and structural errors for the shipping-info aggregate.
#[derive(Debug, Clone, PartialEq)]
pub enum ShippingInfoError {
    /// A service selection carries a blank code.
    EmptyServiceCode,
    /// The same service code appears twice.
    DuplicateServiceCode(String),
    /// The customs additional fee is below zero.
    NegativeAdditionalFee(f64),
    /// Serialization to the storage contract failed.
    EncodeFailed(String),
    /// A storage column value did not match the contract.
    DecodeFailed(String),
}

impl Display for ShippingInfoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyServiceCode => write!(f, "service selection has a blank code"),
            Self::DuplicateServiceCode(code) => {
                write!(f, "service `{code}` is selected more than once")
            }
            Self::NegativeAdditionalFee(fee) => {
                write!(f, "customs additional fee {fee} is negative")
            }
            Self::EncodeFailed(message) => write!(f, "shipping info encode failed: {message}"),
            Self::DecodeFailed(message) => write!(f, "shipping info decode failed: {message}"),
        }
    }
}

impl Error for ShippingInfoError {}
