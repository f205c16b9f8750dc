pub mod addon_service;
pub mod availability_service;
pub mod booking_service;
pub mod pricing_service;
pub mod quote_service;
pub mod sizing_service;
