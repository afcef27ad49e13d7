use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Image shown for products whose own image is missing or unusable.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://placehold.co/400x300?text=Sin+imagen";

/// Values that older drafts wrote into `image` when the field was left empty.
const IMAGE_SENTINELS: &[&str] = &["undefined", "null", "none"];

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: image.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Overwrites the editable fields, keeping `id`.
    ///
    /// A `None` description leaves the current one in place.
    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.price = fields.price;
        self.image = fields.image;
        if let Some(description) = fields.description {
            self.description = description;
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Price: ${}", format_price(self.price))?;
        writeln!(f, "Image: {}", self.image)?;
        if !self.description.is_empty() {
            writeln!(f, "\n{}", self.description)?;
        }
        Ok(())
    }
}

/// The editable part of a product, as submitted by the admin form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: f64,
    pub image: String,
    pub description: Option<String>,
}

impl ProductFields {
    pub fn new(name: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            image: image.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            image: self.image,
            description: self.description.unwrap_or_default(),
        }
    }
}

/// Formats a price the way the storefront shows it: no decimals for whole
/// amounts, two otherwise.
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{:.0}", price)
    } else {
        format!("{:.2}", price)
    }
}

/// Returns true if `image` can be shown as-is.
pub fn is_usable_image(image: &str) -> bool {
    let trimmed = image.trim();
    if trimmed.is_empty()
        || IMAGE_SENTINELS
            .iter()
            .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
    {
        return false;
    }

    match Url::parse(trimmed) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "data"),
        Err(_) => false,
    }
}

/// Applies the product normalization rules: missing descriptions become empty,
/// unusable images become the placeholder, and lists keep one record per id
/// with a finite, non-negative price.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    placeholder_image: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_IMAGE)
    }
}

impl Normalizer {
    pub fn new(placeholder_image: impl Into<String>) -> Self {
        Self {
            placeholder_image: placeholder_image.into(),
        }
    }

    pub fn placeholder_image(&self) -> &str {
        &self.placeholder_image
    }

    pub fn normalize(&self, mut product: Product) -> Product {
        if is_usable_image(&product.image) {
            product.image = product.image.trim().to_string();
        } else {
            product.image = self.placeholder_image.clone();
        }
        product
    }

    /// Normalizes every product, dropping unpriceable records and later
    /// records that reuse an id.
    pub fn normalize_all(&self, products: Vec<Product>) -> Vec<Product> {
        let mut seen = HashSet::with_capacity(products.len());
        let mut normalized = Vec::with_capacity(products.len());

        for product in products {
            if !product.price.is_finite() || product.price < 0.0 {
                tracing::warn!(id = product.id, price = product.price, "Dropping product with invalid price");
                continue;
            }
            if !seen.insert(product.id) {
                tracing::warn!(id = product.id, name = %product.name, "Dropping product with duplicate id");
                continue;
            }
            normalized.push(self.normalize(product));
        }

        normalized
    }

    /// Normalizes untyped JSON records, dropping the ones that are not products.
    pub fn normalize_values(&self, values: Vec<Value>) -> Vec<Product> {
        let products = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<Product>(value) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Dropping record that is not a product");
                    None
                }
            })
            .collect();

        self.normalize_all(products)
    }
}

/// Strings pass through; null and any other JSON value read as empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}
