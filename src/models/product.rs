use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// How a product's quoted price is accumulated over a stay.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// One flat rate for the whole booking, looked up at check-in.
    PerStay,
    /// Rates accumulated per calendar night.
    PerNight,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub min_stay_nights: u32,
    pub max_stay_nights: u32,
    pub max_guests_per_dome: u32,
    pub pricing_mode: PricingMode,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime>,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

fn default_active() -> bool {
    true
}
