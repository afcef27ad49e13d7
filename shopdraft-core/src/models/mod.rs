mod form;
mod product;

pub use form::{ProductForm, ValidationError};
pub use product::{
    format_price, is_usable_image, Normalizer, Product, ProductFields, DEFAULT_PLACEHOLDER_IMAGE,
};
