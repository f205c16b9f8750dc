use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::db::store::{BookingStore, StoreError};
use crate::models::addon::Addon;
use crate::models::availability::{BlockedDate, InventoryRecord};
use crate::models::booking::Booking;
use crate::models::cart::Cart;
use crate::models::pricing_rule::PricingRule;
use crate::models::product::Product;

const PRODUCTS: &str = "Products";
const PRICING_RULES: &str = "PricingRules";
const BLOCKED_DATES: &str = "BlockedDates";
const INVENTORY: &str = "Inventory";
const ADDONS: &str = "Addons";
const CARTS: &str = "Carts";
const BOOKINGS: &str = "Bookings";

const READ_RETRY_BACKOFF: Duration = Duration::from_millis(250);
const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB-backed implementation of the booking store. Every external
/// document shape is normalized into the canonical models at this boundary;
/// the engine never sees source-specific field names.
#[derive(Clone)]
pub struct MongoStore {
    client: Arc<Client>,
    database: String,
    default_total_inventory: i64,
}

impl MongoStore {
    pub fn new(client: Arc<Client>, config: &AppConfig) -> Self {
        Self {
            client,
            database: config.database.clone(),
            default_total_inventory: config.default_total_inventory,
        }
    }

    fn db(&self) -> mongodb::Database {
        self.client.database(&self.database)
    }

    fn inventory(&self) -> Collection<InventoryRecord> {
        self.db().collection::<InventoryRecord>(INVENTORY)
    }

    /// A duplicate (product, date) insert means another writer created the
    /// record first; the reservation then falls back to the conditional
    /// update path.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "product_id": 1, "date": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.inventory()
            .create_index(index)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    /// Reads are retried once with a short backoff; a second failure
    /// surfaces as `StoreError`, never as an empty "available" default.
    async fn find_all<T>(
        &self,
        coll: &Collection<T>,
        filter: Document,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned + Send + Sync + Unpin,
    {
        match fetch_all(coll, filter.clone()).await {
            Ok(items) => Ok(items),
            Err(first) => {
                eprintln!("Store read failed, retrying once: {}", first);
                tokio::time::sleep(READ_RETRY_BACKOFF).await;
                fetch_all(coll, filter)
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))
            }
        }
    }

    async fn find_one<T>(
        &self,
        coll: &Collection<T>,
        filter: Document,
    ) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned + Send + Sync + Unpin,
    {
        match coll.find_one(filter.clone()).await {
            Ok(found) => Ok(found),
            Err(first) => {
                eprintln!("Store read failed, retrying once: {}", first);
                tokio::time::sleep(READ_RETRY_BACKOFF).await;
                coll.find_one(filter)
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))
            }
        }
    }
}

async fn fetch_all<T>(coll: &Collection<T>, filter: Document) -> mongodb::error::Result<Vec<T>>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    coll.find(filter).await?.try_collect().await
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_err)) => {
            write_err.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}

impl BookingStore for MongoStore {
    async fn get_product(&self, id: &ObjectId) -> Result<Option<Product>, StoreError> {
        let coll = self.db().collection::<Product>(PRODUCTS);
        self.find_one(&coll, doc! { "_id": *id }).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let coll = self.db().collection::<Product>(PRODUCTS);
        self.find_all(&coll, doc! {}).await
    }

    async fn list_pricing_rules(
        &self,
        product_id: &ObjectId,
    ) -> Result<Vec<PricingRule>, StoreError> {
        let coll = self.db().collection::<PricingRule>(PRICING_RULES);
        self.find_all(&coll, doc! { "product_id": *product_id }).await
    }

    async fn list_blocked_dates(
        &self,
        product_id: &ObjectId,
    ) -> Result<Vec<BlockedDate>, StoreError> {
        let coll = self.db().collection::<BlockedDate>(BLOCKED_DATES);
        self.find_all(&coll, doc! { "product_id": *product_id }).await
    }

    async fn get_inventory(
        &self,
        product_id: &ObjectId,
        date: NaiveDate,
    ) -> Result<Option<InventoryRecord>, StoreError> {
        let coll = self.inventory();
        self.find_one(&coll, doc! { "product_id": *product_id, "date": date.to_string() })
            .await
    }

    async fn list_inventory(
        &self,
        product_id: &ObjectId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<InventoryRecord>, StoreError> {
        let coll = self.inventory();
        // ISO dates compare correctly as strings.
        let filter = doc! {
            "product_id": *product_id,
            "date": { "$gte": from.to_string(), "$lt": until.to_string() },
        };
        self.find_all(&coll, filter).await
    }

    async fn list_addons(&self, product_id: &ObjectId) -> Result<Vec<Addon>, StoreError> {
        let coll = self.db().collection::<Addon>(ADDONS);
        self.find_all(&coll, doc! { "product_ids": *product_id }).await
    }

    async fn try_reserve(
        &self,
        product_id: &ObjectId,
        date: NaiveDate,
    ) -> Result<bool, StoreError> {
        let coll = self.inventory();
        let filter = doc! {
            "product_id": *product_id,
            "date": date.to_string(),
            // The capacity check and the increment are one server-side
            // operation; two racing writers cannot both pass it.
            "$expr": { "$lt": ["$booked_count", "$total_inventory"] },
        };
        let update = doc! { "$inc": { "booked_count": 1 } };

        match coll.find_one_and_update(filter.clone(), update.clone()).await {
            Ok(Some(_)) => return Ok(true),
            Ok(None) => {}
            Err(e) => return Err(StoreError::Unavailable(e.to_string())),
        }

        // No row matched: either the date is sold out, or no record exists
        // yet (absence means no known bookings, allow-by-default).
        let existing = self
            .find_one(&coll, doc! { "product_id": *product_id, "date": date.to_string() })
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        let record = InventoryRecord {
            id: None,
            product_id: *product_id,
            date,
            booked_count: 1,
            total_inventory: self.default_total_inventory,
        };
        match coll.insert_one(&record).await {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => {
                // Lost the insert race; retry the conditional update once.
                match coll.find_one_and_update(filter, update).await {
                    Ok(found) => Ok(found.is_some()),
                    Err(e) => Err(StoreError::Unavailable(e.to_string())),
                }
            }
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }

    async fn release(&self, product_id: &ObjectId, date: NaiveDate) -> Result<(), StoreError> {
        let coll = self.inventory();
        let filter = doc! {
            "product_id": *product_id,
            "date": date.to_string(),
            "booked_count": { "$gt": 0 },
        };
        coll.update_one(filter, doc! { "$inc": { "booked_count": -1 } })
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn insert_cart(&self, cart: &Cart) -> Result<ObjectId, StoreError> {
        let coll = self.db().collection::<Cart>(CARTS);
        let result = coll
            .insert_one(cart)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Unavailable("cart insert returned no id".to_string()))
    }

    async fn get_cart(&self, id: &ObjectId) -> Result<Option<Cart>, StoreError> {
        let coll = self.db().collection::<Cart>(CARTS);
        self.find_one(&coll, doc! { "_id": *id }).await
    }

    async fn mark_cart_paid(
        &self,
        cart_id: &ObjectId,
        charge_ref: &str,
        confirmation_code: &str,
    ) -> Result<(), StoreError> {
        let coll = self.db().collection::<Cart>(CARTS);
        let update = doc! {
            "$set": {
                "status": "paid",
                "charge_ref": charge_ref,
                "confirmation_code": confirmation_code,
                "updated_at": DateTime::now(),
            }
        };
        coll.update_one(doc! { "_id": *cart_id }, update)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<ObjectId, StoreError> {
        let coll = self.db().collection::<Booking>(BOOKINGS);
        let result = coll
            .insert_one(booking)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Unavailable("booking insert returned no id".to_string()))
    }

    async fn get_booking(&self, id: &ObjectId) -> Result<Option<Booking>, StoreError> {
        let coll = self.db().collection::<Booking>(BOOKINGS);
        self.find_one(&coll, doc! { "_id": *id }).await
    }

    async fn confirm_booking(&self, id: &ObjectId) -> Result<(), StoreError> {
        let coll = self.db().collection::<Booking>(BOOKINGS);
        let update = doc! {
            "$set": { "status": "confirmed", "updated_at": DateTime::now() }
        };
        coll.update_one(doc! { "_id": *id }, update)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
