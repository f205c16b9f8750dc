use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// An explicit operator-imposed closure of one calendar day. Absence of a
/// record means the day is not blocked (allow-by-default).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BlockedDate {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub product_id: ObjectId,
    /// When set, the closure applies to one add-on rather than the product.
    #[serde(default)]
    pub addon_id: Option<ObjectId>,
    pub date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

impl BlockedDate {
    /// Whether this record closes the product itself for booking.
    pub fn blocks_product(&self) -> bool {
        self.addon_id.is_none()
    }
}

/// Per product, per date unit counters.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InventoryRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub product_id: ObjectId,
    pub date: NaiveDate,
    pub booked_count: i64,
    pub total_inventory: i64,
}

impl InventoryRecord {
    pub fn has_capacity(&self) -> bool {
        self.booked_count < self.total_inventory
    }
}
