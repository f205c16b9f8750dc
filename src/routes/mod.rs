pub mod availability;
pub mod booking;
pub mod health;
pub mod payment;
pub mod product;
pub mod quote;
