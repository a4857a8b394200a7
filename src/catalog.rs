//! Read-only product lookup consumed by the review subsystem.

use std::collections::HashMap;

/// What the review subsystem needs to know about a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub id: u64,
    pub name: String,
    /// Review count advertised in the catalog; selects how many seed reviews to show.
    pub review_count: u32,
}

impl ProductSummary {
    pub fn new(id: u64, name: impl Into<String>, review_count: u32) -> Self {
        Self {
            id,
            name: name.into(),
            review_count,
        }
    }
}

pub trait ProductCatalog {
    fn product(&self, id: u64) -> Option<ProductSummary>;

    /// Display name, or `Proizvod #<id>` for products the catalog does not know.
    fn product_name(&self, id: u64) -> String {
        self.product(id)
            .map(|p| p.name)
            .unwrap_or_else(|| format!("Proizvod #{}", id))
    }
}

/// Catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: HashMap<u64, ProductSummary>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, product: ProductSummary) -> Self {
        self.insert(product);
        self
    }

    pub fn insert(&mut self, product: ProductSummary) {
        self.products.insert(product.id, product);
    }

    /// The storefront's honey range.
    pub fn honey() -> Self {
        [
            (1, "Bagremov med", 12),
            (2, "Livadni med", 3),
            (3, "Kaduljin med", 7),
            (4, "Kestenov med", 24),
            (5, "Lipov med", 41),
            (6, "Vrijesak med", 5),
            (7, "Cvjetni med s propolisom", 18),
            (8, "Medljikovac", 33),
        ]
        .into_iter()
        .fold(Self::new(), |catalog, (id, name, reviews)| {
            catalog.with_product(ProductSummary::new(id, name, reviews))
        })
    }
}

impl ProductCatalog for StaticCatalog {
    fn product(&self, id: u64) -> Option<ProductSummary> {
        self.products.get(&id).cloned()
    }
}
