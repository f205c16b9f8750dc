use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuoteRequest {
    pub product_id: String,
    pub check_in: NaiveDate,
    /// Defaults to the product's minimum stay when omitted.
    #[serde(default)]
    pub nights: Option<u32>,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants: u32,
    #[serde(default)]
    pub addon_ids: Vec<String>,
}

/// Why a requested stay cannot be booked. This is a normal outcome, not an
/// error: it travels inside a 200 response with `available: false`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnavailableReason {
    /// An operator closed this day explicitly.
    Blocked { date: NaiveDate },
    /// Every unit on this day is already booked.
    SoldOut { date: NaiveDate },
    /// No pricing rule covers a day that needs pricing. Distinct from a
    /// genuinely zero-cost stay.
    NoRateForDate { date: NaiveDate },
}

/// One night's (or, for per-stay products, the whole stay's) charge.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NightCharge {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Money components of a bookable quote, all in AED per the wire contract.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct QuoteTotals {
    /// Base stay price for one dome.
    pub base_per_dome: f64,
    /// Selected add-on charges for one dome.
    pub addons_per_dome: f64,
    /// (base + add-ons) multiplied by the dome count.
    pub subtotal: f64,
    pub vat: f64,
    pub total: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Quote {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnavailableReason>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub domes: u32,
    // A flattened `None` serializes to no fields at all.
    #[serde(flatten)]
    pub totals: Option<QuoteTotals>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breakdown: Vec<NightCharge>,
}

impl Quote {
    pub fn unavailable(
        reason: UnavailableReason,
        check_in: NaiveDate,
        check_out: NaiveDate,
        nights: u32,
        domes: u32,
    ) -> Self {
        Self {
            available: false,
            reason: Some(reason),
            check_in,
            check_out,
            nights,
            domes,
            totals: None,
            breakdown: Vec::new(),
        }
    }
}
