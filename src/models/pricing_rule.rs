use chrono::NaiveDate;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A date-ranged seasonal price quote for one product. Ranges are inclusive
/// on both ends; overlaps are legal in the source data and disambiguated by
/// `priority` (higher wins).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PricingRule {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub product_id: ObjectId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub adult_rate: f64,
    #[serde(default)]
    pub child_rate: f64,
    #[serde(default)]
    pub infant_rate: f64,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub created_at: Option<DateTime>,
}

impl PricingRule {
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}
