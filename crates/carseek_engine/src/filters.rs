use serde::{Deserialize, Serialize};

use crate::types::SellerType;

/// One immutable snapshot of the search form. The coordinator compares
/// snapshots with `==` to decide whether anything actually changed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    pub price_min: Option<u32>,
    pub price_max: Option<u32>,
    pub year_min: Option<u16>,
    pub year_max: Option<u16>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub location: Option<String>,
    pub seller_type: Option<SellerType>,
    pub page: Option<u32>,
}

impl SearchFilters {
    /// Query-string pairs in the order the listings API documents them.
    /// Unset fields are omitted entirely.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(price_min) = self.price_min {
            pairs.push(("price_min", price_min.to_string()));
        }
        if let Some(price_max) = self.price_max {
            pairs.push(("price_max", price_max.to_string()));
        }
        if let Some(year_min) = self.year_min {
            pairs.push(("year_min", year_min.to_string()));
        }
        if let Some(year_max) = self.year_max {
            pairs.push(("year_max", year_max.to_string()));
        }
        if let Some(brand) = &self.brand {
            pairs.push(("brand", brand.clone()));
        }
        if let Some(model) = &self.model {
            pairs.push(("model", model.clone()));
        }
        if let Some(location) = &self.location {
            pairs.push(("location", location.clone()));
        }
        if let Some(seller_type) = self.seller_type {
            pairs.push(("seller_type", seller_type.as_str().to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}
