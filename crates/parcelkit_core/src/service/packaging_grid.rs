//! Packaging grid presenter for admin shipment packaging.
//!
//! # Responsibility
//! - Pick the grid template variant for the shipment's route.
//! - Aggregate per-product customs attributes once per presenter and
//!   answer per-product accessor calls from that aggregate.
//!
//! # Invariants
//! - The product catalog is consulted at most once per presenter instance,
//!   regardless of which accessors run or in what order.
//! - Template selection is a pure function of route and shipper country.
//!
//! # See also
//! - `crate::catalog` for the attribute and country sources.

use crate::catalog::{CatalogError, CountryCatalog, CountryOption, ProductCatalog};
use crate::config::ModuleConfig;
use crate::model::country::CountryCode;
use crate::model::customs::ProductCustomsAttributes;
use crate::model::shipment::{ProductId, ShipmentContext};
use once_cell::unsync::OnceCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shipper countries served by the business customer shipping backend.
/// All other origins book cross-border labels through the global backend.
const BCS_SHIPPER_COUNTRIES: [&str; 2] = ["DE", "AT"];

pub type GridResult<T> = Result<T, GridError>;

/// Errors from packaging grid accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The product id is not part of the presenter's shipment.
    UnknownProduct(ProductId),
    /// The backing catalog failed to resolve attributes or countries.
    Catalog(CatalogError),
}

impl Display for GridError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownProduct(id) => {
                write!(f, "product {id} is not part of this shipment")
            }
            Self::Catalog(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownProduct(_) => None,
            Self::Catalog(err) => Some(err),
        }
    }
}

impl From<CatalogError> for GridError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

/// Grid template variant rendered by the packaging popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridTemplate {
    /// Domestic and intra-EU shipments: no customs columns.
    Standard,
    /// Cross-border via the business customer shipping backend.
    Bcs,
    /// Cross-border via the global label backend.
    Gl,
}

impl GridTemplate {
    /// Template file rendered for this variant.
    pub fn path(self) -> &'static str {
        match self {
            Self::Standard => "order/packaging/grid.html",
            Self::Bcs => "order/packaging/grid/bcs.html",
            Self::Gl => "order/packaging/grid/gl.html",
        }
    }
}

/// Presenter backing the packaging popup for one shipment.
pub struct PackagingGridPresenter<M, P, C>
where
    M: ModuleConfig,
    P: ProductCatalog,
    C: CountryCatalog,
{
    config: M,
    products: P,
    countries: C,
    shipment: ShipmentContext,
    aggregated: OnceCell<BTreeMap<ProductId, ProductCustomsAttributes>>,
}

impl<M, P, C> PackagingGridPresenter<M, P, C>
where
    M: ModuleConfig,
    P: ProductCatalog,
    C: CountryCatalog,
{
    pub fn new(config: M, products: P, countries: C, shipment: ShipmentContext) -> Self {
        Self {
            config,
            products,
            countries,
            shipment,
            aggregated: OnceCell::new(),
        }
    }

    /// Picks the template variant for the shipment's route.
    ///
    /// # Contract
    /// - Routes inside the shipper's customs territory render `Standard`.
    /// - Cross-border routes render `Bcs` for DE/AT shippers, `Gl` otherwise.
    pub fn select_template(&self) -> GridTemplate {
        let store_id = self.shipment.store_id;
        if !self
            .config
            .is_cross_border_route(&self.shipment.destination_country, store_id)
        {
            return GridTemplate::Standard;
        }

        let shipper = self.config.shipper_country(store_id);
        if BCS_SHIPPER_COUNTRIES.contains(&shipper.as_str()) {
            GridTemplate::Bcs
        } else {
            GridTemplate::Gl
        }
    }

    /// Tariff number maintained for the product, if any.
    pub fn tariff_number(&self, product_id: ProductId) -> GridResult<Option<&str>> {
        Ok(self.shipment_attributes(product_id)?.tariff_number.as_deref())
    }

    /// Export description maintained for the product, if any.
    pub fn export_description(&self, product_id: ProductId) -> GridResult<Option<&str>> {
        Ok(self
            .shipment_attributes(product_id)?
            .export_description
            .as_deref())
    }

    /// Dangerous-goods category maintained for the product, if any.
    pub fn dangerous_goods_category(&self, product_id: ProductId) -> GridResult<Option<&str>> {
        Ok(self
            .shipment_attributes(product_id)?
            .dangerous_goods_category
            .as_deref())
    }

    /// Country of manufacture for the product.
    ///
    /// Falls back to the shipper country when the product has no value
    /// maintained, so customs rows always carry an origin.
    pub fn country_of_manufacture(&self, product_id: ProductId) -> GridResult<CountryCode> {
        let maintained = self
            .aggregate()?
            .get(&product_id)
            .and_then(|attributes| attributes.country_of_manufacture.clone());

        Ok(maintained.unwrap_or_else(|| self.config.shipper_country(self.shipment.store_id)))
    }

    /// Countries offered by the country-of-manufacture selector.
    pub fn countries(&self) -> GridResult<Vec<CountryOption>> {
        Ok(self.countries.country_options()?)
    }

    /// Escapes a value for embedding in an HTML attribute.
    pub fn escape_html_attr(&self, value: &str, escape_single_quote: bool) -> String {
        escape_html_attr(value, escape_single_quote)
    }

    fn aggregate(&self) -> GridResult<&BTreeMap<ProductId, ProductCustomsAttributes>> {
        self.aggregated.get_or_try_init(|| {
            let product_ids = self.shipment.product_ids();
            Ok(self
                .products
                .customs_attributes(self.shipment.store_id, &product_ids)?)
        })
    }

    fn shipment_attributes(&self, product_id: ProductId) -> GridResult<&ProductCustomsAttributes> {
        self.aggregate()?
            .get(&product_id)
            .ok_or(GridError::UnknownProduct(product_id))
    }
}

/// Escapes `&`, `<`, `>` and `"` for HTML attribute contexts.
///
/// Single quotes are escaped only when `escape_single_quote` is set, for
/// attributes delimited with `'`.
pub fn escape_html_attr(value: &str, escape_single_quote: bool) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' if escape_single_quote => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_html_attr;

    #[test]
    fn escapes_attribute_metacharacters() {
        assert_eq!(
            escape_html_attr(r#"<a href="x">&"#, false),
            "&lt;a href=&quot;x&quot;&gt;&amp;"
        );
    }

    #[test]
    fn single_quote_escaping_is_opt_in() {
        assert_eq!(escape_html_attr("it's", false), "it's");
        assert_eq!(escape_html_attr("it's", true), "it&#039;s");
    }

    #[test]
    fn ampersand_is_not_double_escaped() {
        assert_eq!(escape_html_attr("&lt;", false), "&amp;lt;");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape_html_attr("85076000", true), "85076000");
    }
}
