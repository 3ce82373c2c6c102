use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MerchCategory {
    Apparel,
    Accessories,
    Gear,
}

impl FromStr for MerchCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apparel" => Ok(MerchCategory::Apparel),
            "accessories" => Ok(MerchCategory::Accessories),
            "gear" => Ok(MerchCategory::Gear),
            other => Err(format!("Unknown product category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MerchVariant {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub available: bool,
}

/// Shop product in the website's listing shape (camelCase on the wire)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MerchProduct {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub price: i64,
    pub currency: String,
    pub category: MerchCategory,
    pub variants: Vec<MerchVariant>,
    pub available: bool,
}

/// Read-only product listing
#[derive(Debug, Clone, Default)]
pub struct MerchCatalog {
    products: Vec<MerchProduct>,
}

impl MerchCatalog {
    pub fn new(products: Vec<MerchProduct>) -> Self {
        Self { products }
    }

    pub fn list(&self, category: Option<MerchCategory>) -> Vec<MerchProduct> {
        self.products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&MerchProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn with_defaults() -> Self {
        Self::new(default_products())
    }
}

fn sized(product_id: &str, price: i64, sold_out: &[&str]) -> Vec<MerchVariant> {
    ["S", "M", "L", "XL"]
        .iter()
        .map(|size| MerchVariant {
            id: format!("{}-{}", product_id, size.to_lowercase()),
            name: size.to_string(),
            price,
            available: !sold_out.contains(size),
        })
        .collect()
}

fn single(product_id: &str, price: i64) -> Vec<MerchVariant> {
    vec![MerchVariant {
        id: format!("{}-one", product_id),
        name: "One size".to_string(),
        price,
        available: true,
    }]
}

pub fn default_products() -> Vec<MerchProduct> {
    vec![
        MerchProduct {
            id: "crew-tee".to_string(),
            name: "Crew Tee".to_string(),
            thumbnail: "/shop/crew-tee.jpg".to_string(),
            price: 3500,
            currency: "EUR".to_string(),
            category: MerchCategory::Apparel,
            variants: sized("crew-tee", 3500, &["XL"]),
            available: true,
        },
        MerchProduct {
            id: "sunset-hoodie".to_string(),
            name: "Sunset Hoodie".to_string(),
            thumbnail: "/shop/sunset-hoodie.jpg".to_string(),
            price: 6900,
            currency: "EUR".to_string(),
            category: MerchCategory::Apparel,
            variants: sized("sunset-hoodie", 6900, &[]),
            available: true,
        },
        MerchProduct {
            id: "logo-cap".to_string(),
            name: "Logo Cap".to_string(),
            thumbnail: "/shop/logo-cap.jpg".to_string(),
            price: 2500,
            currency: "EUR".to_string(),
            category: MerchCategory::Accessories,
            variants: single("logo-cap", 2500),
            available: true,
        },
        MerchProduct {
            id: "dry-bag".to_string(),
            name: "20L Dry Bag".to_string(),
            thumbnail: "/shop/dry-bag.jpg".to_string(),
            price: 3900,
            currency: "EUR".to_string(),
            category: MerchCategory::Gear,
            variants: single("dry-bag", 3900),
            available: false,
        },
    ]
}
