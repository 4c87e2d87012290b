pub mod date;
pub mod query;
pub mod state;

pub use date::{DateFilter, DateRange};
pub use query::{Predicate, SortColumn, SortKey, TransactionQuery};
pub use state::FilterState;
