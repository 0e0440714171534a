//! Catalog and cart wire types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::description::ProductDescription;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Product identifier
    ProductId
);
id_type!(
    /// Brand identifier
    BrandId
);
id_type!(
    /// Category identifier
    CategoryId
);
id_type!(
    /// Sub-category identifier
    SubCategoryId
);

/// A phone offered by the shop
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Color name
    #[serde(default)]
    pub color: Option<String>,
    /// List price
    pub price: f64,
    /// Whether `discount_price` applies
    #[serde(default)]
    pub is_discount: bool,
    /// Discounted price
    #[serde(default)]
    pub discount_price: Option<f64>,
    /// Units in stock
    #[serde(default)]
    pub quantity: u32,
    /// Whether the current user has this product in their cart
    #[serde(default)]
    pub is_in_my_cart: bool,
    /// Structured description
    #[serde(default)]
    pub description: ProductDescription,
}

impl Product {
    /// Create a product with only the required fields
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: None,
            color: None,
            price,
            is_discount: false,
            discount_price: None,
            quantity: 0,
            is_in_my_cart: false,
            description: ProductDescription::default(),
        }
    }

    /// Put the product on sale
    #[must_use]
    pub const fn with_discount(mut self, discount_price: f64) -> Self {
        self.is_discount = true;
        self.discount_price = Some(discount_price);
        self
    }

    /// Price the customer actually pays
    #[must_use]
    pub fn effective_price(&self) -> f64 {
        match (self.is_discount, self.discount_price) {
            (true, Some(discount)) => discount,
            _ => self.price,
        }
    }
}

/// A product together with how many units are in the cart
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// The product
    pub product: Product,
    /// Units in the cart
    pub quantity: u32,
}

impl CartLine {
    /// Effective price times quantity
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.product.effective_price() * f64::from(self.quantity)
    }
}

/// Phone manufacturer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Identifier
    pub id: BrandId,
    /// Display name
    pub name: String,
}

/// Second-level category
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    /// Identifier
    pub id: SubCategoryId,
    /// Display name
    pub name: String,
    /// Parent category, when the backend sends it
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// Top-level category
///
/// `sub_categories` is only populated by the category tree endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Identifier
    pub id: CategoryId,
    /// Display name
    pub name: String,
    /// Nested sub-categories
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

/// Price bounds reported next to a filtered page
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest price among matching products
    pub min: f64,
    /// Highest price among matching products
    pub max: f64,
}

/// One page of the filtered product listing
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// Products on this page
    #[serde(default)]
    pub products: Vec<Product>,
    /// Lowest matching price
    #[serde(default)]
    pub min_price: Option<f64>,
    /// Highest matching price
    #[serde(default)]
    pub max_price: Option<f64>,
}

impl ProductPage {
    /// Price bounds, if the backend reported both
    #[must_use]
    pub fn price_range(&self) -> Option<PriceRange> {
        Some(PriceRange {
            min: self.min_price?,
            max: self.max_price?,
        })
    }
}

/// Catalog filter chosen by the user
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductFilter {
    /// Name search, empty for none
    pub search: String,
    /// Brand facet
    pub brand_id: Option<BrandId>,
    /// Category facet
    pub category_id: Option<CategoryId>,
    /// Sub-category facet
    pub sub_category_id: Option<SubCategoryId>,
    /// Lower price bound
    pub min_price: Option<f64>,
    /// Upper price bound
    pub max_price: Option<f64>,
}

impl ProductFilter {
    /// Filter on a name search
    #[must_use]
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }

    /// Restrict to a brand
    #[must_use]
    pub const fn with_brand(mut self, brand_id: BrandId) -> Self {
        self.brand_id = Some(brand_id);
        self
    }

    /// Restrict to a category
    #[must_use]
    pub const fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Restrict to a sub-category
    #[must_use]
    pub const fn with_sub_category(mut self, sub_category_id: SubCategoryId) -> Self {
        self.sub_category_id = Some(sub_category_id);
        self
    }

    /// Restrict to a price window
    #[must_use]
    pub const fn with_price(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }
}

/// A filter plus the page to fetch
#[derive(Clone, Debug, PartialEq)]
pub struct ProductQuery {
    /// What to match
    pub filter: ProductFilter,
    /// 1-based page number
    pub page_number: u32,
    /// Products per page
    pub page_size: u32,
}

impl ProductQuery {
    /// Query string pairs; unset filter components are omitted
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let filter = &self.filter;
        let mut params = Vec::with_capacity(8);

        if !filter.search.is_empty() {
            params.push(("name", filter.search.clone()));
        }
        if let Some(min) = filter.min_price {
            params.push(("minPrice", min.to_string()));
        }
        if let Some(max) = filter.max_price {
            params.push(("maxPrice", max.to_string()));
        }
        if let Some(id) = filter.brand_id {
            params.push(("brandId", id.to_string()));
        }
        if let Some(id) = filter.category_id {
            params.push(("categoryId", id.to_string()));
        }
        if let Some(id) = filter.sub_category_id {
            params.push(("subCategoryId", id.to_string()));
        }
        params.push(("pageNumber", self.page_number.to_string()));
        params.push(("pageSize", self.page_size.to_string()));

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price() {
        let phone = Product::new(1, "Pixel", 700.0);
        assert!((phone.effective_price() - 700.0).abs() < f64::EPSILON);

        let sale = phone.with_discount(550.0);
        assert!((sale.effective_price() - 550.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_product_decodes_camel_case() {
        let json = r#"{
            "id": 7,
            "name": "Galaxy",
            "price": 900,
            "isDiscount": true,
            "discountPrice": 800,
            "quantity": 3,
            "isInMyCart": true,
            "description": "{\"Description\":\"Big screen\"}"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId(7));
        assert!(product.is_in_my_cart);
        assert!((product.effective_price() - 800.0).abs() < f64::EPSILON);
        assert_eq!(
            product.description.summary().map(|e| e.value.as_str()),
            Some("Big screen")
        );
    }

    #[test]
    fn test_query_params_skip_unset_components() {
        let query = ProductQuery {
            filter: ProductFilter::search("iphone").with_brand(BrandId(2)),
            page_number: 3,
            page_size: 10,
        };

        assert_eq!(
            query.to_params(),
            vec![
                ("name", "iphone".to_string()),
                ("brandId", "2".to_string()),
                ("pageNumber", "3".to_string()),
                ("pageSize", "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_price_range_needs_both_bounds() {
        let page = ProductPage {
            products: Vec::new(),
            min_price: Some(100.0),
            max_price: None,
        };
        assert_eq!(page.price_range(), None);
    }
}
