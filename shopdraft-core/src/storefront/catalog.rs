use serde_json::Value;

use crate::models::Product;
use crate::sync::RemoteStore;

/// Where a catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Remote,
    /// The built-in sample, used when the remote is unreachable or empty.
    Sample,
}

/// Products the storefront shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Keeps only records that can be displayed and sold: a non-zero id, a
    /// name, a numeric price and an image.
    pub fn from_payload(values: Vec<Value>) -> Self {
        let products = values.iter().filter_map(displayable_product).collect();
        Self { products }
    }

    pub fn sample() -> Self {
        Self::new(vec![
            Product::new(1, "Pizza Margherita", 120.0, "https://i.imgur.com/2DsA3bT.jpeg")
                .with_description(
                    "Pizza clasica con salsa de tomate, mozzarella fresca y albahaca.",
                ),
            Product::new(2, "Pizza Pepperoni", 140.0, "https://i.imgur.com/sScttJm.jpeg")
                .with_description("Nuestra pizza mas popular, cubierta con abundante pepperoni."),
            Product::new(3, "Refresco", 25.0, "https://i.imgur.com/vT29nI5.jpeg")
                .with_description("Botella de 600ml. Elige tu sabor."),
            Product::new(4, "Postre de Chocolate", 50.0, "https://i.imgur.com/M6c2TjC.jpeg"),
        ])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn displayable_product(value: &Value) -> Option<Product> {
    let id = value.get("id")?.as_i64().filter(|id| *id != 0)?;
    let name = value.get("name")?.as_str().filter(|s| !s.is_empty())?;
    let price = value.get("price")?.as_f64()?;
    let image = value.get("image")?.as_str().filter(|s| !s.is_empty())?;
    let description = value
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();

    Some(Product::new(id, name, price, image).with_description(description))
}

/// Fetches the published catalog, falling back to the sample when the remote
/// fails or has nothing displayable.
pub async fn fetch_catalog<R: RemoteStore>(remote: &R) -> (Catalog, CatalogSource) {
    match remote.fetch().await {
        Ok(values) => {
            let catalog = Catalog::from_payload(values);
            if catalog.is_empty() {
                tracing::warn!("No valid products in remote catalog, using sample data");
                (Catalog::sample(), CatalogSource::Sample)
            } else {
                (catalog, CatalogSource::Remote)
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not load remote catalog, using sample data");
            (Catalog::sample(), CatalogSource::Sample)
        }
    }
}
