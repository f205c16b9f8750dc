use chrono::NaiveDate;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::models::quote::QuoteRequest;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created, awaiting payment.
    Cart,
    /// Payment verified.
    Confirmed,
    /// Cancelled by an operator; bookings are never hard-deleted.
    Cancelled,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub product_id: ObjectId,
    pub cart_id: ObjectId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub guests_adult: u32,
    pub guests_children: u32,
    pub guests_infants: u32,
    pub domes: u32,
    #[serde(default)]
    pub addon_ids: Vec<ObjectId>,
    pub price_subtotal: f64,
    pub price_addons: f64,
    pub price_vat: f64,
    pub price_total: f64,
    pub status: BookingStatus,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub guest_instructions: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime>,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

/// Request body for creating a booking: the quote inputs plus customer
/// identity fields. The quote is always recomputed server-side; client
/// totals are never trusted.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingRequest {
    #[serde(flatten)]
    pub quote: QuoteRequest,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub guest_instructions: Option<String>,
}

/// Identifiers handed back to the widget after a booking is created.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingReceipt {
    pub id: ObjectId,
    pub cart_id: ObjectId,
}
