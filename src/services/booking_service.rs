use std::fmt;

use chrono::Days;
use mongodb::bson::{oid::ObjectId, DateTime};
use rand::Rng;

use crate::db::store::{BookingStore, StoreError};
use crate::models::booking::{Booking, BookingReceipt, BookingRequest, BookingStatus};
use crate::models::cart::{Cart, CartStatus};
use crate::models::quote::UnavailableReason;
use crate::services::quote_service::{QuoteError, QuoteService};

#[derive(Debug)]
pub enum BookingError {
    InvalidInput(String),
    /// The stay cannot be booked; a normal outcome for the caller to render.
    Unavailable(UnavailableReason),
    Store(StoreError),
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            BookingError::Unavailable(_) => write!(f, "stay is not available"),
            BookingError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl From<QuoteError> for BookingError {
    fn from(e: QuoteError) -> Self {
        match e {
            QuoteError::InvalidInput(msg) => BookingError::InvalidInput(msg),
            QuoteError::Store(e) => BookingError::Store(e),
        }
    }
}

impl From<StoreError> for BookingError {
    fn from(e: StoreError) -> Self {
        BookingError::Store(e)
    }
}

// Glyphs prone to transcription mistakes (0/O, 1/I/L) are left out; guests
// read these codes over the phone.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 6;

pub struct BookingService;

impl BookingService {
    pub fn generate_confirmation_code() -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..CODE_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..CODE_ALPHABET.len());
                CODE_ALPHABET[idx] as char
            })
            .collect();
        format!("DOME-{}", suffix)
    }

    /// Quote-accepted commit: recompute the quote server-side, claim
    /// inventory night by night, then persist the Cart (`unpaid`) and
    /// Booking (`cart`) pair. Losing the inventory race on any night unwinds
    /// the nights already claimed and reports the stay as sold out.
    pub async fn create_booking<S: BookingStore>(
        store: &S,
        vat_rate: f64,
        request: &BookingRequest,
    ) -> Result<BookingReceipt, BookingError> {
        let quote = QuoteService::compute_quote(store, vat_rate, &request.quote).await?;
        if let Some(reason) = quote.reason.clone() {
            return Err(BookingError::Unavailable(reason));
        }
        let totals = quote
            .totals
            .clone()
            .ok_or_else(|| BookingError::InvalidInput("quote produced no totals".to_string()))?;

        let product_id = ObjectId::parse_str(&request.quote.product_id)
            .map_err(|_| BookingError::InvalidInput("malformed product id".to_string()))?;
        let mut addon_ids = Vec::with_capacity(request.quote.addon_ids.len());
        for raw_id in &request.quote.addon_ids {
            let id = ObjectId::parse_str(raw_id)
                .map_err(|_| BookingError::InvalidInput("malformed addon id".to_string()))?;
            addon_ids.push(id);
        }

        let mut reserved = Vec::new();
        let mut day = quote.check_in;
        while day < quote.check_out {
            match store.try_reserve(&product_id, day).await {
                Ok(true) => reserved.push(day),
                Ok(false) => {
                    Self::release_all(store, &product_id, &reserved).await;
                    return Err(BookingError::Unavailable(UnavailableReason::SoldOut {
                        date: day,
                    }));
                }
                Err(e) => {
                    Self::release_all(store, &product_id, &reserved).await;
                    return Err(BookingError::Store(e));
                }
            }
            day = day + Days::new(1);
        }

        let now = DateTime::now();
        let cart = Cart {
            id: None,
            status: CartStatus::Unpaid,
            charge_ref: None,
            confirmation_code: None,
            customer_email: request.customer_email.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        let cart_id = store.insert_cart(&cart).await?;

        let booking = Booking {
            id: None,
            product_id,
            cart_id,
            check_in: quote.check_in,
            check_out: quote.check_out,
            nights: quote.nights,
            guests_adult: request.quote.adults,
            guests_children: request.quote.children,
            guests_infants: request.quote.infants,
            domes: quote.domes,
            addon_ids,
            price_subtotal: totals.subtotal,
            price_addons: totals.addons_per_dome * f64::from(quote.domes),
            price_vat: totals.vat,
            price_total: totals.total,
            status: BookingStatus::Cart,
            customer_name: request.customer_name.clone(),
            customer_email: request.customer_email.clone(),
            customer_phone: request.customer_phone.clone(),
            guest_instructions: request.guest_instructions.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        let booking_id = store.insert_booking(&booking).await?;

        Ok(BookingReceipt {
            id: booking_id,
            cart_id,
        })
    }

    async fn release_all<S: BookingStore>(
        store: &S,
        product_id: &ObjectId,
        reserved: &[chrono::NaiveDate],
    ) {
        for day in reserved {
            if let Err(e) = store.release(product_id, *day).await {
                eprintln!("Failed to release inventory for {}: {}", day, e);
            }
        }
    }

    /// Payment-verified transition: Booking `cart` -> `confirmed`, Cart
    /// `unpaid` -> `paid`, confirmation code issued and persisted. Calling
    /// it again for an already-confirmed booking returns the existing code.
    pub async fn confirm_payment<S: BookingStore>(
        store: &S,
        booking_id: &ObjectId,
        charge_ref: &str,
    ) -> Result<String, BookingError> {
        let booking = store
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| BookingError::InvalidInput("unknown booking".to_string()))?;

        if booking.status == BookingStatus::Confirmed {
            if let Some(cart) = store.get_cart(&booking.cart_id).await? {
                if let Some(code) = cart.confirmation_code {
                    return Ok(code);
                }
            }
        }

        let code = Self::generate_confirmation_code();
        store.confirm_booking(booking_id).await?;
        store.mark_cart_paid(&booking.cart_id, charge_ref, &code).await?;
        Ok(code)
    }
}
