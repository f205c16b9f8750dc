use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use crate::models::availability::{BlockedDate, InventoryRecord};
use crate::models::quote::UnavailableReason;

pub struct AvailabilityService;

impl AvailabilityService {
    /// Whether an operator closed this product for `day`. Add-on-scoped
    /// block records do not close the product itself.
    pub fn is_blocked(blocked: &[BlockedDate], day: NaiveDate) -> bool {
        blocked.iter().any(|b| b.blocks_product() && b.date == day)
    }

    /// Check every date in `[check_in, check_out)` against both gates:
    /// explicit blocks first, then inventory exhaustion. A missing inventory
    /// record counts as available (no known bookings yet). Returns the first
    /// failing date and its cause, or `None` when the range is bookable.
    pub fn check_range(
        blocked: &[BlockedDate],
        inventory: &HashMap<NaiveDate, InventoryRecord>,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Option<UnavailableReason> {
        let mut day = check_in;
        while day < check_out {
            if Self::is_blocked(blocked, day) {
                return Some(UnavailableReason::Blocked { date: day });
            }
            if let Some(record) = inventory.get(&day) {
                if !record.has_capacity() {
                    return Some(UnavailableReason::SoldOut { date: day });
                }
            }
            day = day + Days::new(1);
        }
        None
    }

    /// Calendar feed for the widget: all dates in `[from, from + horizon)`
    /// that cannot start a booking, combining explicit blocks and sold-out
    /// inventory. Past dates never appear; the caller passes today as `from`.
    pub fn blocked_calendar(
        blocked: &[BlockedDate],
        inventory: &[InventoryRecord],
        from: NaiveDate,
        horizon_days: i64,
    ) -> Vec<NaiveDate> {
        let until = from + Days::new(horizon_days.max(0) as u64);

        let mut dates: Vec<NaiveDate> = blocked
            .iter()
            .filter(|b| b.blocks_product() && b.date >= from && b.date < until)
            .map(|b| b.date)
            .chain(
                inventory
                    .iter()
                    .filter(|r| !r.has_capacity() && r.date >= from && r.date < until)
                    .map(|r| r.date),
            )
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }
}
