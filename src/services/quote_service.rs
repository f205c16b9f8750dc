use std::collections::HashMap;
use std::fmt;

use chrono::{Days, NaiveDate};
use mongodb::bson::oid::ObjectId;

use crate::db::store::{BookingStore, StoreError};
use crate::models::product::Product;
use crate::models::quote::{Quote, QuoteRequest, QuoteTotals};
use crate::services::addon_service::AddonService;
use crate::services::availability_service::AvailabilityService;
use crate::services::pricing_service::PricingService;
use crate::services::sizing_service::SizingService;

#[derive(Debug)]
pub enum QuoteError {
    /// Rejected before any store access; surfaced as a 400.
    InvalidInput(String),
    Store(StoreError),
}

impl fmt::Display for QuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            QuoteError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl From<StoreError> for QuoteError {
    fn from(e: StoreError) -> Self {
        QuoteError::Store(e)
    }
}

/// Money rounding for AED amounts on the wire.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub struct QuoteService;

impl QuoteService {
    /// Resolve a quote request into a bookable/not-bookable decision plus
    /// price. Unavailability (blocked, sold out, unpriceable day) is a
    /// normal `available: false` outcome; only malformed input and store
    /// failures are errors.
    pub async fn compute_quote<S: BookingStore>(
        store: &S,
        vat_rate: f64,
        request: &QuoteRequest,
    ) -> Result<Quote, QuoteError> {
        let (product, product_id) = Self::load_product(store, request).await?;

        let nights = request.nights.unwrap_or(product.min_stay_nights);
        if nights < product.min_stay_nights || nights > product.max_stay_nights {
            return Err(QuoteError::InvalidInput(format!(
                "stay must be between {} and {} nights",
                product.min_stay_nights, product.max_stay_nights
            )));
        }
        let check_in = request.check_in;
        let check_out = check_in + Days::new(u64::from(nights));

        let domes = SizingService::domes_required(request.adults, request.children, request.infants);

        let blocked = store.list_blocked_dates(&product_id).await?;
        let inventory = Self::inventory_snapshot(store, &product_id, check_in, check_out).await?;
        if let Some(reason) =
            AvailabilityService::check_range(&blocked, &inventory, check_in, check_out)
        {
            return Ok(Quote::unavailable(reason, check_in, check_out, nights, domes));
        }

        let rules = store.list_pricing_rules(&product_id).await?;
        let stay = match PricingService::price_stay(
            &product,
            &rules,
            check_in,
            check_out,
            request.children,
            request.infants,
        ) {
            Ok(stay) => stay,
            Err(no_rate) => {
                let reason = crate::models::quote::UnavailableReason::NoRateForDate {
                    date: no_rate.0,
                };
                return Ok(Quote::unavailable(reason, check_in, check_out, nights, domes));
            }
        };

        let addons_per_dome =
            Self::selected_addons_charge(store, &product_id, check_in, &request.addon_ids).await?;

        let base_per_dome = round_money(stay.total);
        let subtotal = round_money((base_per_dome + addons_per_dome) * f64::from(domes));
        let vat = round_money(subtotal * vat_rate);
        let total = round_money(subtotal + vat);

        Ok(Quote {
            available: true,
            reason: None,
            check_in,
            check_out,
            nights,
            domes,
            totals: Some(QuoteTotals {
                base_per_dome,
                addons_per_dome,
                subtotal,
                vat,
                total,
            }),
            breakdown: stay.breakdown,
        })
    }

    async fn load_product<S: BookingStore>(
        store: &S,
        request: &QuoteRequest,
    ) -> Result<(Product, ObjectId), QuoteError> {
        if request.adults == 0 {
            return Err(QuoteError::InvalidInput(
                "at least one adult is required".to_string(),
            ));
        }
        let product_id = ObjectId::parse_str(&request.product_id)
            .map_err(|_| QuoteError::InvalidInput("malformed product id".to_string()))?;
        let product = store
            .get_product(&product_id)
            .await?
            .ok_or_else(|| QuoteError::InvalidInput("unknown product".to_string()))?;
        if !product.active {
            return Err(QuoteError::InvalidInput("product is not active".to_string()));
        }
        Ok((product, product_id))
    }

    async fn inventory_snapshot<S: BookingStore>(
        store: &S,
        product_id: &ObjectId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<HashMap<NaiveDate, crate::models::availability::InventoryRecord>, QuoteError> {
        let mut snapshot = HashMap::new();
        let mut day = check_in;
        while day < check_out {
            if let Some(record) = store.get_inventory(product_id, day).await? {
                snapshot.insert(day, record);
            }
            day = day + Days::new(1);
        }
        Ok(snapshot)
    }

    /// Per-dome charge of the selected add-ons. Selecting an add-on that is
    /// not eligible for this product and check-in is a client error, not an
    /// availability outcome.
    async fn selected_addons_charge<S: BookingStore>(
        store: &S,
        product_id: &ObjectId,
        check_in: NaiveDate,
        selected: &[String],
    ) -> Result<f64, QuoteError> {
        if selected.is_empty() {
            return Ok(0.0);
        }

        let addons = store.list_addons(product_id).await?;
        let eligible = AddonService::eligible_addons(&addons, product_id, Some(check_in));

        let mut charge = 0.0;
        for raw_id in selected {
            let addon_id = ObjectId::parse_str(raw_id)
                .map_err(|_| QuoteError::InvalidInput("malformed addon id".to_string()))?;
            let addon = eligible
                .iter()
                .find(|a| a.id.as_ref() == Some(&addon_id))
                .ok_or_else(|| {
                    QuoteError::InvalidInput("addon not eligible for these dates".to_string())
                })?;
            charge += addon.price;
        }
        Ok(round_money(charge))
    }
}
