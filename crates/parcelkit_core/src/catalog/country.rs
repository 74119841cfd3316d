//! Country directory feeding the grid's country-of-manufacture selector.

use crate::catalog::CatalogResult;
use crate::model::country::{CountryCode, CountryCodeError};

/// One selectable country, code plus display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryOption {
    pub code: CountryCode,
    pub label: String,
}

/// Directory of countries offered by the host platform.
pub trait CountryCatalog {
    /// Returns all selectable countries, ordered by label.
    fn country_options(&self) -> CatalogResult<Vec<CountryOption>>;
}

/// Fixed country list for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCountryCatalog {
    options: Vec<CountryOption>,
}

impl InMemoryCountryCatalog {
    /// Builds a directory from `(code, label)` pairs, sorted by label.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, CountryCodeError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Vec::new();
        for (code, label) in pairs {
            options.push(CountryOption {
                code: CountryCode::new(code)?,
                label: label.to_string(),
            });
        }
        options.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(Self { options })
    }
}

impl CountryCatalog for InMemoryCountryCatalog {
    fn country_options(&self) -> CatalogResult<Vec<CountryOption>> {
        Ok(self.options.clone())
    }
}
