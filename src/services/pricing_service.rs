use std::fmt;

use chrono::{Days, NaiveDate};

use crate::models::pricing_rule::PricingRule;
use crate::models::product::{PricingMode, Product};
use crate::models::quote::NightCharge;

/// Pricing could not be determined for a required day. Deliberately distinct
/// from a zero-cost stay: the two are financially different outcomes.
#[derive(Debug, PartialEq, Eq)]
pub struct NoRateForDate(pub NaiveDate);

impl fmt::Display for NoRateForDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no pricing rule covers {}", self.0)
    }
}

/// Per-dome price of a stay, with one breakdown entry per charged day.
#[derive(Debug, Clone, PartialEq)]
pub struct StayPrice {
    pub total: f64,
    pub breakdown: Vec<NightCharge>,
}

pub struct PricingService;

impl PricingService {
    /// Find the rule active on `day`: the interval match is inclusive on
    /// both ends, ties resolved by priority descending, then later season
    /// start, then most recently created. Deterministic regardless of the
    /// order rules come back from the store.
    pub fn resolve_rate(rules: &[PricingRule], day: NaiveDate) -> Option<&PricingRule> {
        let mut matching: Vec<&PricingRule> = rules.iter().filter(|r| r.covers(day)).collect();
        matching.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(b.start_date.cmp(&a.start_date))
                .then(b.created_at.cmp(&a.created_at))
        });

        if matching.len() > 1 && matching[0].priority == matching[1].priority {
            // Data-quality problem in the rule set, not a runtime failure.
            eprintln!(
                "WARNING: overlapping pricing rules with equal priority {} cover {}",
                matching[0].priority, day
            );
        }

        matching.into_iter().next()
    }

    /// Per-dome rate for one charged day: one adult rate plus per-head
    /// child/infant supplements (either may legitimately be zero).
    fn day_charge(rule: &PricingRule, children: u32, infants: u32) -> f64 {
        rule.adult_rate
            + f64::from(children) * rule.child_rate
            + f64::from(infants) * rule.infant_rate
    }

    /// Price one dome for the stay. `per_stay` products resolve exactly one
    /// rate at check-in; `per_night` products accumulate over every night in
    /// `[check_in, check_out)`. Any uncovered required day fails the whole
    /// calculation.
    pub fn price_stay(
        product: &Product,
        rules: &[PricingRule],
        check_in: NaiveDate,
        check_out: NaiveDate,
        children: u32,
        infants: u32,
    ) -> Result<StayPrice, NoRateForDate> {
        match product.pricing_mode {
            PricingMode::PerStay => {
                let rule = Self::resolve_rate(rules, check_in).ok_or(NoRateForDate(check_in))?;
                let amount = Self::day_charge(rule, children, infants);
                Ok(StayPrice {
                    total: amount,
                    breakdown: vec![NightCharge {
                        date: check_in,
                        amount,
                    }],
                })
            }
            PricingMode::PerNight => {
                let mut total = 0.0;
                let mut breakdown = Vec::new();
                let mut day = check_in;
                while day < check_out {
                    let rule = Self::resolve_rate(rules, day).ok_or(NoRateForDate(day))?;
                    let amount = Self::day_charge(rule, children, infants);
                    total += amount;
                    breakdown.push(NightCharge { date: day, amount });
                    day = day + Days::new(1);
                }
                Ok(StayPrice { total, breakdown })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{oid::ObjectId, DateTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(
        product_id: ObjectId,
        start: NaiveDate,
        end: NaiveDate,
        adult: f64,
        priority: i32,
    ) -> PricingRule {
        PricingRule {
            id: Some(ObjectId::new()),
            product_id,
            start_date: start,
            end_date: end,
            adult_rate: adult,
            child_rate: 0.0,
            infant_rate: 0.0,
            priority,
            created_at: Some(DateTime::now()),
        }
    }

    fn product(mode: PricingMode) -> Product {
        Product {
            id: Some(ObjectId::new()),
            name: "1 Night".to_string(),
            description: None,
            min_stay_nights: 1,
            max_stay_nights: 7,
            max_guests_per_dome: 5,
            pricing_mode: mode,
            active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_single_covering_rule_resolves() {
        let pid = ObjectId::new();
        let rules = vec![rule(pid, date(2026, 3, 1), date(2026, 3, 31), 2500.0, 0)];
        let resolved = PricingService::resolve_rate(&rules, date(2026, 3, 15)).unwrap();
        assert_eq!(resolved.adult_rate, 2500.0);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let pid = ObjectId::new();
        let rules = vec![rule(pid, date(2026, 3, 1), date(2026, 3, 31), 2500.0, 0)];
        assert!(PricingService::resolve_rate(&rules, date(2026, 3, 1)).is_some());
        assert!(PricingService::resolve_rate(&rules, date(2026, 3, 31)).is_some());
        assert!(PricingService::resolve_rate(&rules, date(2026, 2, 28)).is_none());
        assert!(PricingService::resolve_rate(&rules, date(2026, 4, 1)).is_none());
    }

    #[test]
    fn test_higher_priority_wins_regardless_of_insertion_order() {
        let pid = ObjectId::new();
        let low = rule(pid, date(2026, 1, 1), date(2026, 12, 31), 1000.0, 0);
        let high = rule(pid, date(2026, 6, 1), date(2026, 6, 30), 1800.0, 5);

        let forward = vec![low.clone(), high.clone()];
        let reversed = vec![high, low];
        let day = date(2026, 6, 15);

        assert_eq!(
            PricingService::resolve_rate(&forward, day).unwrap().adult_rate,
            1800.0
        );
        assert_eq!(
            PricingService::resolve_rate(&reversed, day).unwrap().adult_rate,
            1800.0
        );
    }

    #[test]
    fn test_festive_season_override() {
        // Base season rule vs a higher-priority festive override starting
        // 2026-12-25: the override must price the check-in, not the base.
        let pid = ObjectId::new();
        let rules = vec![
            rule(pid, date(2026, 1, 13), date(2026, 12, 24), 3850.0, 0),
            rule(pid, date(2026, 12, 25), date(2027, 1, 5), 4900.0, 2),
        ];
        let resolved = PricingService::resolve_rate(&rules, date(2026, 12, 25)).unwrap();
        assert_eq!(resolved.adult_rate, 4900.0);
    }

    #[test]
    fn test_equal_priority_breaks_on_later_start() {
        let pid = ObjectId::new();
        let early = rule(pid, date(2026, 1, 1), date(2026, 12, 31), 1000.0, 1);
        let late = rule(pid, date(2026, 7, 1), date(2026, 12, 31), 1500.0, 1);
        let rules = [early, late];
        let resolved = PricingService::resolve_rate(&rules, date(2026, 8, 1)).unwrap();
        assert_eq!(resolved.adult_rate, 1500.0);
    }

    #[test]
    fn test_per_stay_invariant_to_checkout() {
        let pid = ObjectId::new();
        let p = product(PricingMode::PerStay);
        let rules = vec![rule(pid, date(2026, 3, 1), date(2026, 3, 31), 3850.0, 0)];

        let one_night =
            PricingService::price_stay(&p, &rules, date(2026, 3, 10), date(2026, 3, 11), 0, 0)
                .unwrap();
        let three_nights =
            PricingService::price_stay(&p, &rules, date(2026, 3, 10), date(2026, 3, 13), 0, 0)
                .unwrap();

        assert_eq!(one_night.total, 3850.0);
        assert_eq!(one_night.total, three_nights.total);
        assert_eq!(one_night.breakdown.len(), 1);
    }

    #[test]
    fn test_per_night_sums_each_night() {
        let pid = ObjectId::new();
        let p = product(PricingMode::PerNight);
        let rules = vec![
            rule(pid, date(2026, 3, 1), date(2026, 3, 10), 1000.0, 0),
            rule(pid, date(2026, 3, 11), date(2026, 3, 31), 1200.0, 0),
        ];

        // Nights 9, 10, 11, 12 (check-out day not charged).
        let stay =
            PricingService::price_stay(&p, &rules, date(2026, 3, 9), date(2026, 3, 13), 0, 0)
                .unwrap();
        assert_eq!(stay.total, 1000.0 + 1000.0 + 1200.0 + 1200.0);
        assert_eq!(stay.breakdown.len(), 4);

        // Order independence: summing the resolved rates in reverse day
        // order gives the same total.
        let mut reverse_total = 0.0;
        for day in [
            date(2026, 3, 12),
            date(2026, 3, 11),
            date(2026, 3, 10),
            date(2026, 3, 9),
        ] {
            reverse_total += PricingService::resolve_rate(&rules, day).unwrap().adult_rate;
        }
        assert_eq!(stay.total, reverse_total);
    }

    #[test]
    fn test_uncovered_day_fails_instead_of_pricing_zero() {
        let pid = ObjectId::new();
        let p = product(PricingMode::PerNight);
        // Coverage gap on 2026-03-11.
        let rules = vec![
            rule(pid, date(2026, 3, 1), date(2026, 3, 10), 1000.0, 0),
            rule(pid, date(2026, 3, 12), date(2026, 3, 31), 1200.0, 0),
        ];

        let result =
            PricingService::price_stay(&p, &rules, date(2026, 3, 10), date(2026, 3, 13), 0, 0);
        assert_eq!(result.unwrap_err(), NoRateForDate(date(2026, 3, 11)));
    }

    #[test]
    fn test_child_and_infant_supplements() {
        let pid = ObjectId::new();
        let p = product(PricingMode::PerStay);
        let mut seasonal = rule(pid, date(2026, 3, 1), date(2026, 3, 31), 3850.0, 0);
        seasonal.child_rate = 400.0;
        seasonal.infant_rate = 100.0;

        let stay =
            PricingService::price_stay(&p, &[seasonal], date(2026, 3, 10), date(2026, 3, 11), 2, 1)
                .unwrap();
        assert_eq!(stay.total, 3850.0 + 2.0 * 400.0 + 100.0);
    }

    #[test]
    fn test_zero_cost_stay_is_distinct_from_failure() {
        let pid = ObjectId::new();
        let p = product(PricingMode::PerStay);
        let rules = vec![rule(pid, date(2026, 3, 1), date(2026, 3, 31), 0.0, 0)];

        let stay =
            PricingService::price_stay(&p, &rules, date(2026, 3, 10), date(2026, 3, 11), 0, 0)
                .unwrap();
        assert_eq!(stay.total, 0.0);
        assert_eq!(stay.breakdown.len(), 1);
    }
}
