pub mod customer_service;
pub mod dashboard_service;
pub mod product_service;
pub mod transaction_service;
