use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// An optional extra (meal plan, transfer, etc.) attachable to a booking.
/// A price of zero means the add-on is included in the base rate.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Addon {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub price: f64,
    pub product_ids: Vec<ObjectId>,
    /// Validity window, inclusive on both ends. An add-on with no window is
    /// always sellable (open policy).
    #[serde(default)]
    pub checkin: Option<NaiveDate>,
    #[serde(default)]
    pub checkout: Option<NaiveDate>,
}
