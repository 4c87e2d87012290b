//! Translation of filter state into an explicit predicate object.
//!
//! Data sources receive a [`TransactionQuery`] and decide how to run it:
//! `SeaOrmStore` turns it into SQL conditions, `MemoryStore` calls
//! [`TransactionQuery::matches`] and [`TransactionQuery::compare`] directly.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    filter::{date::DateRange, state::FilterState},
    models::Transaction,
    routes::params::SortOrder,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    CustomerIn(Vec<String>),
    ProductIn(Vec<i64>),
    /// Inclusive on both ends.
    DateBetween { from: NaiveDate, to: NaiveDate },
}

impl Predicate {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            Predicate::CustomerIn(ids) => ids.contains(&transaction.customer_id),
            Predicate::ProductIn(ids) => ids.contains(&transaction.product_id),
            Predicate::DateBetween { from, to } => {
                DateRange { from: *from, to: *to }.contains(transaction.date)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Date,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: SortColumn,
    pub order: SortOrder,
}

/// Newest business date first; id breaks ties so pages are stable.
pub const DEFAULT_SORT: [SortKey; 2] = [
    SortKey {
        column: SortColumn::Date,
        order: SortOrder::Desc,
    },
    SortKey {
        column: SortColumn::Id,
        order: SortOrder::Desc,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub predicates: Vec<Predicate>,
    pub sort: Vec<SortKey>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self::all()
    }
}

impl TransactionQuery {
    /// Every transaction, in the default order.
    pub fn all() -> Self {
        Self {
            predicates: Vec::new(),
            sort: DEFAULT_SORT.to_vec(),
        }
    }

    pub fn build(state: &FilterState, today: NaiveDate) -> AppResult<Self> {
        let mut query = Self::all();

        if !state.customers().is_empty() {
            query
                .predicates
                .push(Predicate::CustomerIn(state.customers().to_vec()));
        }

        if !state.products().is_empty() {
            query
                .predicates
                .push(Predicate::ProductIn(state.products().to_vec()));
        }

        if let Some(DateRange { from, to }) = state.date().bounds(today)? {
            query.predicates.push(Predicate::DateBetween { from, to });
        }

        Ok(query)
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.predicates.iter().all(|p| p.matches(transaction))
    }

    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        self.sort
            .iter()
            .map(|key| {
                let ordering = match key.column {
                    SortColumn::Date => a.date.cmp(&b.date),
                    SortColumn::Id => a.id.cmp(&b.id),
                };
                match key.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::DateBetween { from, to } => Some(DateRange {
                from: *from,
                to: *to,
            }),
            _ => None,
        })
    }
}
