pub mod addon;
pub mod availability;
pub mod booking;
pub mod cart;
pub mod pricing_rule;
pub mod product;
pub mod quote;
