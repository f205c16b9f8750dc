use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;

use crate::models::addon::Addon;

pub struct AddonService;

impl AddonService {
    /// Add-ons offerable for a product on a concrete check-in date. With no
    /// check-in selected nothing is offered, so the widget never shows
    /// options that cannot yet be validated against dates. An add-on with a
    /// validity window is eligible iff `checkin <= check_in <= checkout`
    /// (inclusive); one without a window is always eligible (open policy).
    pub fn eligible_addons(
        addons: &[Addon],
        product_id: &ObjectId,
        check_in: Option<NaiveDate>,
    ) -> Vec<Addon> {
        let Some(check_in) = check_in else {
            return Vec::new();
        };

        addons
            .iter()
            .filter(|a| a.product_ids.contains(product_id))
            .filter(|a| match (a.checkin, a.checkout) {
                (Some(start), Some(end)) => start <= check_in && check_in <= end,
                _ => true,
            })
            .cloned()
            .collect()
    }
}
