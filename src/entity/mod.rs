pub mod customers;
pub mod products;
pub mod profiles;
pub mod transactions;

pub use customers::Entity as Customers;
pub use products::Entity as Products;
pub use profiles::Entity as Profiles;
pub use transactions::Entity as Transactions;
