pub mod customers;
pub mod dashboard;
pub mod products;
pub mod transactions;
