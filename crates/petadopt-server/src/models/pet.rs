use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];
}

/// A listing in the shape served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    pub id: String,
    pub name: String,
    pub species: Species,
    pub breed: String,
    pub age: String,
    pub image_url: String,
    pub description: String,
    pub source: String,
    pub original_link: String,
    pub location: String,
    pub gender: Gender,
    pub size: Size,
    pub posted_date: String,
    pub price: f64,
    pub category: String,
    pub subcategory: Option<String>,
    pub promoted: bool,
    pub county_raw: String,
    pub city_raw: String,
    pub service_type: Option<String>,
}

/// A listing as the backend returns it. Any field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendPet {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub price: Option<BackendPrice>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub promoted: Option<bool>,
}

/// The scraper stores prices as a breakdown; older records carry a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BackendPrice {
    Amount(f64),
    Breakdown {
        #[serde(default)]
        price_after_discount: Option<f64>,
        #[serde(default)]
        price_before_discount: Option<f64>,
        #[serde(default)]
        price_without_any_discounts: Option<f64>,
    },
}

impl BackendPrice {
    /// What a buyer pays: the discounted price when there is one, otherwise
    /// the regular price.
    pub fn amount(self) -> Option<f64> {
        match self {
            BackendPrice::Amount(value) => Some(value),
            BackendPrice::Breakdown {
                price_after_discount,
                price_before_discount,
                price_without_any_discounts,
            } => price_after_discount
                .or(price_without_any_discounts)
                .or(price_before_discount),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub counties: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub subcategories: Vec<String>,
    #[serde(default)]
    pub breeds: Vec<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub species: Vec<String>,
}
