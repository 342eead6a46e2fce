//! Catalog
//!
//! Product cards loaded from YAML, and the "add to cart" flow from a card.
//!
//! ```yaml
//! products:
//!   mug:
//!     id: 1
//!     title: Enamel Mug
//!     price: "12.00"
//!     images:
//!       - /images/mug-front.jpg
//!       - /images/mug-side.jpg
//! ```

use std::{fs, path::Path};

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_norway::Mapping;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    products::{LineId, ProductSnapshot},
    slideshow::Slideshow,
};

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
    #[error("Invalid price for {0}: {1}")]
    InvalidPrice(String, String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// How a line id is derived when a product is added from its card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LineIdentity {
    /// The catalog product id; adding the same product again increments its line.
    #[default]
    Catalog,

    /// Unix milliseconds plus the card index; every add creates a new line.
    PerAdd,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Mapping,
}

#[derive(Debug, Deserialize)]
struct ProductEntry {
    id: u64,
    title: String,
    price: String,
    #[serde(default)]
    images: Vec<String>,
}

/// A product card.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogProduct {
    /// Catalog key
    pub key: String,

    /// Catalog product id
    pub id: u64,

    /// Display name
    pub title: String,

    /// Unit price
    pub price: Decimal,

    /// Image URIs in display order
    pub images: SmallVec<[String; 4]>,
}

impl CatalogProduct {
    /// Capture the card's product for adding to the cart.
    ///
    /// `card_index` is the card's position on the page and `now` the time of the
    /// add; both only matter for [`LineIdentity::PerAdd`].
    #[must_use]
    pub fn snapshot(
        &self,
        identity: LineIdentity,
        card_index: usize,
        now: Timestamp,
    ) -> ProductSnapshot {
        let id = match identity {
            LineIdentity::Catalog => LineId(self.id),
            LineIdentity::PerAdd => {
                let millis = u64::try_from(now.as_millisecond()).unwrap_or(0);
                let offset = u64::try_from(card_index).unwrap_or(u64::MAX);

                LineId(millis.saturating_add(offset))
            }
        };

        ProductSnapshot {
            id,
            title: self.title.clone(),
            price: self.price,
            image: self.images.first().cloned().unwrap_or_default(),
        }
    }

    /// The card's image slideshow.
    #[must_use]
    pub fn slideshow(&self, interval: SignedDuration) -> Slideshow {
        Slideshow::new(self.images.iter().cloned(), interval)
    }
}

/// Product cards, in the order they appear in the file.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<CatalogProduct>,
}

impl Catalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a price is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed or a price is invalid.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_norway::from_str(contents)?;

        let products = file
            .products
            .into_iter()
            .map(|(key, entry)| {
                let key: String = serde_norway::from_value(key)?;
                let entry: ProductEntry = serde_norway::from_value(entry)?;
                let price = parse_price(&key, &entry.price)?;

                Ok(CatalogProduct {
                    key,
                    id: entry.id,
                    title: entry.title,
                    price,
                    images: entry.images.into_iter().collect(),
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        Ok(Self { products })
    }

    /// Look up a product by key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if no product has that key.
    pub fn product(&self, key: &str) -> Result<&CatalogProduct, CatalogError> {
        self.products
            .iter()
            .find(|product| product.key == key)
            .ok_or_else(|| CatalogError::ProductNotFound(key.to_string()))
    }

    /// Position of a product's card, used as the card index.
    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.products.iter().position(|product| product.key == key)
    }

    /// Iterate over products in file order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogProduct> {
        self.products.iter()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Parse a decimal price such as `"12.99"`.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidPrice`] if `value` is not a decimal number.
pub fn parse_price(key: &str, value: &str) -> Result<Decimal, CatalogError> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(key.to_string(), value.to_string()))
}
