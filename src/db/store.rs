use std::fmt;

use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;

use crate::models::addon::Addon;
use crate::models::availability::{BlockedDate, InventoryRecord};
use crate::models::booking::Booking;
use crate::models::cart::Cart;
use crate::models::pricing_rule::PricingRule;
use crate::models::product::Product;

/// The rule/inventory collaborator failed to respond. Never treated as
/// "available" or priced as zero; callers surface it as a 500.
#[derive(Debug)]
pub enum StoreError {
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(detail) => write!(f, "store unavailable: {}", detail),
        }
    }
}

/// Data-store seam consumed by the engine and the booking flow. The engine
/// side (rules, blocked dates, inventory, add-ons) is read-only; all
/// mutation goes through the reservation and booking/cart operations.
pub trait BookingStore {
    async fn get_product(&self, id: &ObjectId) -> Result<Option<Product>, StoreError>;
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn list_pricing_rules(
        &self,
        product_id: &ObjectId,
    ) -> Result<Vec<PricingRule>, StoreError>;
    async fn list_blocked_dates(
        &self,
        product_id: &ObjectId,
    ) -> Result<Vec<BlockedDate>, StoreError>;
    async fn get_inventory(
        &self,
        product_id: &ObjectId,
        date: NaiveDate,
    ) -> Result<Option<InventoryRecord>, StoreError>;
    async fn list_inventory(
        &self,
        product_id: &ObjectId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<InventoryRecord>, StoreError>;
    async fn list_addons(&self, product_id: &ObjectId) -> Result<Vec<Addon>, StoreError>;

    /// Atomic check-and-increment of `booked_count` for one (product, date).
    /// Returns false when the date is sold out. This is the only way the
    /// flow claims inventory; a read-then-write pair would race.
    async fn try_reserve(&self, product_id: &ObjectId, date: NaiveDate)
        -> Result<bool, StoreError>;
    /// Best-effort decrement, used to unwind a partial multi-night
    /// reservation when a later night loses the race.
    async fn release(&self, product_id: &ObjectId, date: NaiveDate) -> Result<(), StoreError>;

    async fn insert_cart(&self, cart: &Cart) -> Result<ObjectId, StoreError>;
    async fn get_cart(&self, id: &ObjectId) -> Result<Option<Cart>, StoreError>;
    async fn mark_cart_paid(
        &self,
        cart_id: &ObjectId,
        charge_ref: &str,
        confirmation_code: &str,
    ) -> Result<(), StoreError>;

    async fn insert_booking(&self, booking: &Booking) -> Result<ObjectId, StoreError>;
    async fn get_booking(&self, id: &ObjectId) -> Result<Option<Booking>, StoreError>;
    async fn confirm_booking(&self, id: &ObjectId) -> Result<(), StoreError>;
}

#[cfg(test)]
pub(crate) mod test_store {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::models::cart::CartStatus;

    /// In-memory store double used by the service tests. Inventory mutation
    /// goes through a single mutex so `try_reserve` keeps the same
    /// exactly-one-winner contract as the Mongo implementation.
    #[derive(Default)]
    pub struct MemoryStore {
        pub products: Vec<Product>,
        pub rules: Vec<PricingRule>,
        pub blocked: Vec<BlockedDate>,
        pub addons: Vec<Addon>,
        pub default_total_inventory: i64,
        pub inventory: Mutex<HashMap<(ObjectId, NaiveDate), InventoryRecord>>,
        pub carts: Mutex<HashMap<ObjectId, Cart>>,
        pub bookings: Mutex<HashMap<ObjectId, Booking>>,
    }

    impl MemoryStore {
        pub fn new(default_total_inventory: i64) -> Self {
            Self {
                default_total_inventory,
                ..Default::default()
            }
        }

        pub fn set_inventory(&self, product_id: ObjectId, date: NaiveDate, booked: i64, total: i64) {
            self.inventory.lock().unwrap().insert(
                (product_id, date),
                InventoryRecord {
                    id: None,
                    product_id,
                    date,
                    booked_count: booked,
                    total_inventory: total,
                },
            );
        }

        pub fn booked_count(&self, product_id: ObjectId, date: NaiveDate) -> i64 {
            self.inventory
                .lock()
                .unwrap()
                .get(&(product_id, date))
                .map(|r| r.booked_count)
                .unwrap_or(0)
        }
    }

    impl BookingStore for MemoryStore {
        async fn get_product(&self, id: &ObjectId) -> Result<Option<Product>, StoreError> {
            Ok(self.products.iter().find(|p| p.id.as_ref() == Some(id)).cloned())
        }

        async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
            Ok(self.products.clone())
        }

        async fn list_pricing_rules(
            &self,
            product_id: &ObjectId,
        ) -> Result<Vec<PricingRule>, StoreError> {
            Ok(self
                .rules
                .iter()
                .filter(|r| r.product_id == *product_id)
                .cloned()
                .collect())
        }

        async fn list_blocked_dates(
            &self,
            product_id: &ObjectId,
        ) -> Result<Vec<BlockedDate>, StoreError> {
            Ok(self
                .blocked
                .iter()
                .filter(|b| b.product_id == *product_id)
                .cloned()
                .collect())
        }

        async fn get_inventory(
            &self,
            product_id: &ObjectId,
            date: NaiveDate,
        ) -> Result<Option<InventoryRecord>, StoreError> {
            Ok(self
                .inventory
                .lock()
                .unwrap()
                .get(&(*product_id, date))
                .cloned())
        }

        async fn list_inventory(
            &self,
            product_id: &ObjectId,
            from: NaiveDate,
            until: NaiveDate,
        ) -> Result<Vec<InventoryRecord>, StoreError> {
            Ok(self
                .inventory
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.product_id == *product_id && r.date >= from && r.date < until)
                .cloned()
                .collect())
        }

        async fn list_addons(&self, product_id: &ObjectId) -> Result<Vec<Addon>, StoreError> {
            Ok(self
                .addons
                .iter()
                .filter(|a| a.product_ids.contains(product_id))
                .cloned()
                .collect())
        }

        async fn try_reserve(
            &self,
            product_id: &ObjectId,
            date: NaiveDate,
        ) -> Result<bool, StoreError> {
            let mut inventory = self.inventory.lock().unwrap();
            let record = inventory.entry((*product_id, date)).or_insert(InventoryRecord {
                id: None,
                product_id: *product_id,
                date,
                booked_count: 0,
                total_inventory: self.default_total_inventory,
            });
            if record.has_capacity() {
                record.booked_count += 1;
                Ok(true)
            } else {
                Ok(false)
            }
        }

        async fn release(&self, product_id: &ObjectId, date: NaiveDate) -> Result<(), StoreError> {
            if let Some(record) = self.inventory.lock().unwrap().get_mut(&(*product_id, date)) {
                if record.booked_count > 0 {
                    record.booked_count -= 1;
                }
            }
            Ok(())
        }

        async fn insert_cart(&self, cart: &Cart) -> Result<ObjectId, StoreError> {
            let id = ObjectId::new();
            let mut cart = cart.clone();
            cart.id = Some(id);
            self.carts.lock().unwrap().insert(id, cart);
            Ok(id)
        }

        async fn get_cart(&self, id: &ObjectId) -> Result<Option<Cart>, StoreError> {
            Ok(self.carts.lock().unwrap().get(id).cloned())
        }

        async fn mark_cart_paid(
            &self,
            cart_id: &ObjectId,
            charge_ref: &str,
            confirmation_code: &str,
        ) -> Result<(), StoreError> {
            let mut carts = self.carts.lock().unwrap();
            let cart = carts
                .get_mut(cart_id)
                .ok_or_else(|| StoreError::Unavailable("unknown cart".to_string()))?;
            cart.status = CartStatus::Paid;
            cart.charge_ref = Some(charge_ref.to_string());
            cart.confirmation_code = Some(confirmation_code.to_string());
            Ok(())
        }

        async fn insert_booking(&self, booking: &Booking) -> Result<ObjectId, StoreError> {
            let id = ObjectId::new();
            let mut booking = booking.clone();
            booking.id = Some(id);
            self.bookings.lock().unwrap().insert(id, booking);
            Ok(id)
        }

        async fn get_booking(&self, id: &ObjectId) -> Result<Option<Booking>, StoreError> {
            Ok(self.bookings.lock().unwrap().get(id).cloned())
        }

        async fn confirm_booking(&self, id: &ObjectId) -> Result<(), StoreError> {
            let mut bookings = self.bookings.lock().unwrap();
            let booking = bookings
                .get_mut(id)
                .ok_or_else(|| StoreError::Unavailable("unknown booking".to_string()))?;
            booking.status = crate::models::booking::BookingStatus::Confirmed;
            Ok(())
        }
    }
}
