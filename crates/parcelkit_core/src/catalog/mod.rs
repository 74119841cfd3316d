//! Read-only catalog seams consumed by the packaging grid.
//!
//! # Responsibility
//! - Define traits for the product attribute source and the country
//!   directory, plus in-memory implementations for tests and embedding
//!   hosts without a full catalog backend.
//!
//! # Invariants
//! - Catalog implementations never mutate product data. Writes belong to
//!   the host platform's own catalog pipeline.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod country;
pub mod product;

pub use country::{CountryCatalog, CountryOption, InMemoryCountryCatalog};
pub use product::{InMemoryProductCatalog, ProductCatalog};

/// Catalog-layer result alias.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors surfaced by catalog backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The backing attribute source failed.
    Backend { message: String },
}

impl CatalogError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend { message } => write!(f, "catalog backend failed: {message}"),
        }
    }
}

impl Error for CatalogError {}
