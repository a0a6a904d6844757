//! Catalog
//!
//! The static, ordered list of products on sale. Every product shares the
//! catalog currency and is addressed by its [`ProductId`].

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::products::{Product, ProductId};

pub mod fixture;

/// Catalog bundled into the binary at build time.
const BUNDLED_CATALOG: &str = include_str!("../../fixtures/catalog.yml");

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// The catalog lists no products
    #[error("Catalog has no products")]
    Empty,
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create a catalog from products listed in display order.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the list is empty, an id repeats, a price is
    /// negative or not a whole amount, or the products are priced in different
    /// currencies.
    pub fn new(products: impl Into<Vec<Product>>) -> Result<Self, CatalogError> {
        let products = products.into();

        let currency = products
            .first()
            .map(|product| product.price.currency())
            .ok_or(CatalogError::Empty)?;

        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            let product_currency = product.price.currency();

            if product_currency != currency {
                return Err(CatalogError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    product_currency.iso_alpha_code.to_string(),
                ));
            }

            if !is_whole_amount(product) {
                return Err(CatalogError::InvalidPrice(format!(
                    "Expected a non-negative whole amount for {}, got: {}",
                    product.id, product.price
                )));
            }

            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Self {
            products,
            index,
            currency,
        })
    }

    /// Load the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the bundled YAML is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUNDLED_CATALOG)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Load a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the YAML is malformed or any product is invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: fixture::CatalogFixture = serde_norway::from_str(yaml)?;

        let products = fixture
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(products)
    }

    /// Get a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|position| self.products.get(*position))
    }

    /// Whether the catalog lists a product with this id.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate over the products in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Get the number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// A catalog is never empty once constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the catalog currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

fn is_whole_amount(product: &Product) -> bool {
    let minor_units = product.price.to_minor_units();

    10_i64
        .checked_pow(product.price.currency().exponent)
        .is_some_and(|scale| minor_units >= 0 && minor_units % scale == 0)
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, INR, USD},
    };
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, minor: i64, currency: &'static Currency) -> Product {
        Product {
            id: ProductId::from(id),
            name: id.to_uppercase(),
            price: Money::from_minor(minor, currency),
            image: String::new(),
        }
    }

    #[test]
    fn bundled_catalog_lists_three_products() -> TestResult {
        let catalog = Catalog::bundled()?;

        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["CHAIN", "RING", "BRACELET"]);
        assert_eq!(catalog.currency(), INR);

        for product in catalog.iter() {
            assert_eq!(product.price, Money::from_minor(36_900, INR));
        }

        Ok(())
    }

    #[test]
    fn product_lookup_by_id() -> TestResult {
        let catalog = Catalog::bundled()?;

        let ring = catalog.product("2").map(|p| p.name.as_str());

        assert_eq!(ring, Some("RING"));
        assert!(catalog.contains("3"));
        assert!(catalog.product("99").is_none());

        Ok(())
    }

    #[test]
    fn new_rejects_empty_list() {
        let result = Catalog::new(Vec::new());

        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let result = Catalog::new([product("a", 100, GBP), product("a", 200, GBP)]);

        assert!(matches!(result, Err(CatalogError::DuplicateProduct(id)) if id.as_str() == "a"));
    }

    #[test]
    fn new_rejects_mixed_currencies() {
        let result = Catalog::new([product("a", 100, GBP), product("b", 100, USD)]);

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch(expected, found)) if expected == "GBP" && found == "USD"
        ));
    }

    #[test]
    fn new_rejects_negative_price() {
        let result = Catalog::new([product("a", 100, INR), product("b", -500, INR)]);

        assert!(matches!(result, Err(CatalogError::InvalidPrice(_))));
    }

    #[test]
    fn new_rejects_fractional_price() {
        let result = Catalog::new([product("a", 2_50, GBP)]);

        assert!(matches!(result, Err(CatalogError::InvalidPrice(_))));
    }

    #[test]
    fn new_accepts_zero_price() -> TestResult {
        let catalog = Catalog::new([product("free", 0, GBP)])?;

        assert_eq!(catalog.len(), 1);

        Ok(())
    }

    #[test]
    fn from_yaml_str_reports_bad_price() {
        let yaml = "products:\n  - id: x\n    name: X\n    price: 1.5 GBP\n";

        let result = Catalog::from_yaml_str(yaml);

        assert!(matches!(result, Err(CatalogError::InvalidPrice(_))));
    }

    #[test]
    fn from_yaml_str_reports_malformed_yaml() {
        let result = Catalog::from_yaml_str("products: [");

        assert!(matches!(result, Err(CatalogError::Yaml(_))));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let result = Catalog::from_path("./fixtures/does-not-exist.yml");

        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
