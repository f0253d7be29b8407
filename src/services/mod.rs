pub mod auth_service;
pub mod customer_service;
pub mod order_service;
pub mod product_service;
pub mod setting_service;
pub mod user_service;
