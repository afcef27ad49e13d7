//! Validation of manually entered product data.

use thiserror::Error;

use super::ProductFields;

/// Reasons a manually entered product is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Product name cannot be empty")]
    EmptyName,
    #[error("Price must be a number, got '{0}'")]
    InvalidPrice(String),
    #[error("Price cannot be negative")]
    NegativePrice,
    #[error("Image URL cannot be empty")]
    EmptyImage,
}

/// Raw text of the product form, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub image: String,
    pub description: Option<String>,
}

impl ProductForm {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            image: image.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks the form and converts it into product fields.
    ///
    /// Name and image are trimmed; the description is kept verbatim.
    pub fn validate(self) -> Result<ProductFields, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let price_text = self.price.trim();
        let price: f64 = price_text
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite())
            .ok_or_else(|| ValidationError::InvalidPrice(price_text.to_string()))?;
        if price < 0.0 {
            return Err(ValidationError::NegativePrice);
        }

        let image = self.image.trim();
        if image.is_empty() {
            return Err(ValidationError::EmptyImage);
        }

        Ok(ProductFields {
            name: name.to_string(),
            price,
            image: image.to_string(),
            description: self.description,
        })
    }
}
