use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    Unpaid,
    Paid,
}

/// Payment envelope for one checkout attempt. Owns its bookings by foreign
/// key on the booking side only.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Cart {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub status: CartStatus,
    /// External payment provider charge reference.
    #[serde(default)]
    pub charge_ref: Option<String>,
    /// Human-readable code issued once payment is verified.
    #[serde(default)]
    pub confirmation_code: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime>,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}
