use parcelkit_core::catalog::{CatalogError, CatalogResult};
use parcelkit_core::{
    CountryCode, GridError, GridTemplate, InMemoryCountryCatalog, InMemoryProductCatalog,
    ModuleSettings, PackagingGridPresenter, ProductCatalog, ProductCustomsAttributes,
    ProductId, ScopedModuleConfig, ShipmentContext, ShipmentItem, StoreId,
};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

fn country(code: &str) -> CountryCode {
    CountryCode::new(code).unwrap()
}

fn config_with_shipper(code: &str) -> ScopedModuleConfig {
    ScopedModuleConfig::new(ModuleSettings {
        shipper_country: country(code),
        ..ModuleSettings::default()
    })
    .unwrap()
}

fn shipment_to(destination: &str, items: Vec<ShipmentItem>) -> ShipmentContext {
    ShipmentContext::new(1, country(destination), items)
}

fn stocked_catalog() -> InMemoryProductCatalog {
    let mut catalog = InMemoryProductCatalog::new();
    catalog
        .insert(
            1,
            10,
            ProductCustomsAttributes {
                country_of_manufacture: Some(country("CN")),
                dangerous_goods_category: Some("01".to_string()),
                tariff_number: Some("85076000".to_string()),
                export_description: Some("battery pack".to_string()),
            },
        )
        .unwrap();
    catalog
        .insert(1, 11, ProductCustomsAttributes::default())
        .unwrap();
    catalog
}

fn countries_catalog() -> InMemoryCountryCatalog {
    InMemoryCountryCatalog::from_pairs([
        ("US", "United States"),
        ("DE", "Germany"),
        ("CN", "China"),
    ])
    .unwrap()
}

fn presenter_for(
    shipper: &str,
    destination: &str,
) -> PackagingGridPresenter<ScopedModuleConfig, InMemoryProductCatalog, InMemoryCountryCatalog> {
    PackagingGridPresenter::new(
        config_with_shipper(shipper),
        stocked_catalog(),
        countries_catalog(),
        shipment_to(destination, vec![ShipmentItem::new(10, 1.0)]),
    )
}

#[test]
fn domestic_route_renders_standard_grid() {
    assert_eq!(
        presenter_for("DE", "DE").select_template(),
        GridTemplate::Standard
    );
}

#[test]
fn intra_eu_route_renders_standard_grid() {
    assert_eq!(
        presenter_for("DE", "AT").select_template(),
        GridTemplate::Standard
    );
}

#[test]
fn cross_border_route_from_de_renders_bcs_grid() {
    assert_eq!(
        presenter_for("DE", "US").select_template(),
        GridTemplate::Bcs
    );
}

#[test]
fn cross_border_route_from_at_renders_bcs_grid() {
    assert_eq!(
        presenter_for("AT", "CH").select_template(),
        GridTemplate::Bcs
    );
}

#[test]
fn cross_border_route_from_other_shipper_renders_gl_grid() {
    assert_eq!(
        presenter_for("FR", "US").select_template(),
        GridTemplate::Gl
    );
}

#[test]
fn store_override_changes_template_selection() {
    let config = ScopedModuleConfig::new(ModuleSettings::default())
        .unwrap()
        .with_store(
            3,
            ModuleSettings {
                shipper_country: country("FR"),
                ..ModuleSettings::default()
            },
        )
        .unwrap();

    let shipment = ShipmentContext::new(3, country("US"), vec![ShipmentItem::new(10, 1.0)]);
    let presenter = PackagingGridPresenter::new(
        config,
        stocked_catalog(),
        countries_catalog(),
        shipment,
    );
    assert_eq!(presenter.select_template(), GridTemplate::Gl);
}

#[test]
fn template_paths_match_rendered_files() {
    assert_eq!(GridTemplate::Standard.path(), "order/packaging/grid.html");
    assert_eq!(GridTemplate::Bcs.path(), "order/packaging/grid/bcs.html");
    assert_eq!(GridTemplate::Gl.path(), "order/packaging/grid/gl.html");
}

struct CountingCatalog {
    inner: InMemoryProductCatalog,
    calls: Rc<Cell<usize>>,
}

impl ProductCatalog for CountingCatalog {
    fn customs_attributes(
        &self,
        store_id: StoreId,
        product_ids: &[ProductId],
    ) -> CatalogResult<BTreeMap<ProductId, ProductCustomsAttributes>> {
        self.calls.set(self.calls.get() + 1);
        self.inner.customs_attributes(store_id, product_ids)
    }
}

#[test]
fn attributes_are_fetched_once_across_all_accessors() {
    let calls = Rc::new(Cell::new(0));
    let catalog = CountingCatalog {
        inner: stocked_catalog(),
        calls: Rc::clone(&calls),
    };
    let shipment = shipment_to(
        "US",
        vec![
            ShipmentItem::new(10, 1.0),
            ShipmentItem::new(11, 2.0),
            ShipmentItem::new(10, 1.0),
        ],
    );
    let presenter = PackagingGridPresenter::new(
        config_with_shipper("DE"),
        catalog,
        countries_catalog(),
        shipment,
    );

    assert_eq!(presenter.tariff_number(10).unwrap(), Some("85076000"));
    assert_eq!(presenter.export_description(11).unwrap(), None);
    assert_eq!(presenter.dangerous_goods_category(10).unwrap(), Some("01"));
    assert_eq!(presenter.country_of_manufacture(11).unwrap(), country("DE"));
    assert_eq!(presenter.tariff_number(11).unwrap(), None);

    assert_eq!(calls.get(), 1);
}

#[test]
fn maintained_country_of_manufacture_is_returned() {
    let presenter = presenter_for("DE", "US");
    assert_eq!(presenter.country_of_manufacture(10).unwrap(), country("CN"));
}

#[test]
fn missing_country_of_manufacture_falls_back_to_shipper() {
    let shipment = shipment_to(
        "US",
        vec![ShipmentItem::new(10, 1.0), ShipmentItem::new(11, 1.0)],
    );
    let presenter = PackagingGridPresenter::new(
        config_with_shipper("DE"),
        stocked_catalog(),
        countries_catalog(),
        shipment,
    );

    // Product 11 exists without a maintained value; 99 is unknown entirely.
    assert_eq!(presenter.country_of_manufacture(11).unwrap(), country("DE"));
    assert_eq!(presenter.country_of_manufacture(99).unwrap(), country("DE"));
}

#[test]
fn value_accessors_reject_products_outside_the_shipment() {
    let presenter = presenter_for("DE", "US");

    let err = presenter.tariff_number(99).unwrap_err();
    assert_eq!(err, GridError::UnknownProduct(99));
    assert_eq!(
        presenter.dangerous_goods_category(99).unwrap_err(),
        GridError::UnknownProduct(99)
    );
}

#[test]
fn unset_attributes_read_as_none_for_known_products() {
    let shipment = shipment_to("US", vec![ShipmentItem::new(11, 1.0)]);
    let presenter = PackagingGridPresenter::new(
        config_with_shipper("DE"),
        stocked_catalog(),
        countries_catalog(),
        shipment,
    );

    assert_eq!(presenter.tariff_number(11).unwrap(), None);
    assert_eq!(presenter.export_description(11).unwrap(), None);
    assert_eq!(presenter.dangerous_goods_category(11).unwrap(), None);
}

#[test]
fn countries_come_from_the_country_catalog_sorted_by_label() {
    let presenter = presenter_for("DE", "US");
    let labels: Vec<String> = presenter
        .countries()
        .unwrap()
        .into_iter()
        .map(|option| option.label)
        .collect();
    assert_eq!(labels, vec!["China", "Germany", "United States"]);
}

struct FailingCatalog;

impl ProductCatalog for FailingCatalog {
    fn customs_attributes(
        &self,
        _store_id: StoreId,
        _product_ids: &[ProductId],
    ) -> CatalogResult<BTreeMap<ProductId, ProductCustomsAttributes>> {
        Err(CatalogError::backend("attribute backend offline"))
    }
}

#[test]
fn catalog_failure_surfaces_as_grid_error() {
    let shipment = shipment_to("US", vec![ShipmentItem::new(10, 1.0)]);
    let presenter = PackagingGridPresenter::new(
        config_with_shipper("DE"),
        FailingCatalog,
        countries_catalog(),
        shipment,
    );

    let err = presenter.tariff_number(10).unwrap_err();
    assert!(matches!(err, GridError::Catalog(_)));
}

struct FlakyCatalog {
    inner: InMemoryProductCatalog,
    calls: Rc<Cell<usize>>,
}

impl ProductCatalog for FlakyCatalog {
    fn customs_attributes(
        &self,
        store_id: StoreId,
        product_ids: &[ProductId],
    ) -> CatalogResult<BTreeMap<ProductId, ProductCustomsAttributes>> {
        self.calls.set(self.calls.get() + 1);
        if self.calls.get() == 1 {
            return Err(CatalogError::backend("attribute backend offline"));
        }
        self.inner.customs_attributes(store_id, product_ids)
    }
}

#[test]
fn failed_fetch_is_retried_and_a_later_success_is_cached() {
    let calls = Rc::new(Cell::new(0));
    let catalog = FlakyCatalog {
        inner: stocked_catalog(),
        calls: Rc::clone(&calls),
    };
    let shipment = shipment_to("US", vec![ShipmentItem::new(10, 1.0)]);
    let presenter = PackagingGridPresenter::new(
        config_with_shipper("DE"),
        catalog,
        countries_catalog(),
        shipment,
    );

    let err = presenter.tariff_number(10).unwrap_err();
    assert!(matches!(err, GridError::Catalog(_)));

    // A fetch failure is not memoized; the next accessor retries.
    assert_eq!(presenter.tariff_number(10).unwrap(), Some("85076000"));
    assert_eq!(presenter.dangerous_goods_category(10).unwrap(), Some("01"));
    assert_eq!(calls.get(), 2);
}

#[test]
fn presenter_escapes_values_for_attribute_context() {
    let presenter = presenter_for("DE", "US");
    assert_eq!(
        presenter.escape_html_attr(r#"2" x 4""#, false),
        "2&quot; x 4&quot;"
    );
    assert_eq!(presenter.escape_html_attr("O'Brien", true), "O&#039;Brien");
}
