//! The user's current transaction filter selections and their canonical
//! query-string form.

use crate::{
    error::{AppError, AppResult},
    filter::date::{DateFilter, DateParams},
    pagination::clamp_page,
    routes::params::TransactionFilterParams,
};

/// Legacy UI label some clients still send for "no filter".
const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    customers: Vec<String>,
    products: Vec<i64>,
    date: DateFilter,
    page: u64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            customers: Vec::new(),
            products: Vec::new(),
            date: DateFilter::All,
            page: 1,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn customers(&self) -> &[String] {
        &self.customers
    }

    pub fn products(&self) -> &[i64] {
        &self.products
    }

    pub fn date(&self) -> DateFilter {
        self.date
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// Replaces the customer selection. An empty selection means every customer.
    pub fn set_customers<I, S>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = ids
            .into_iter()
            .map(Into::into)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        ids.sort();
        ids.dedup();
        self.customers = ids;
        self.page = 1;
        self
    }

    /// Replaces the product selection. An empty selection means every product.
    pub fn set_products<I>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut ids: Vec<i64> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        self.products = ids;
        self.page = 1;
        self
    }

    pub fn set_date_filter(&mut self, date: DateFilter) -> &mut Self {
        self.date = date;
        self.page = 1;
        self
    }

    pub fn set_page(&mut self, page: i64) -> &mut Self {
        self.page = clamp_page(page);
        self
    }

    /// Drops every filter and returns to the first page.
    pub fn clear(&mut self) -> &mut Self {
        *self = FilterState::default();
        self
    }

    /// Canonical wire form. Cleared filters and page 1 are left out entirely.
    pub fn to_params(&self) -> TransactionFilterParams {
        let date = self.date.to_params();
        TransactionFilterParams {
            customer: join(self.customers.iter()),
            product: join(self.products.iter()),
            date_filter: date.mode,
            date_from: date.date_from,
            date_to: date.date_to,
            month: date.month,
            year: date.year,
            page: (self.page > 1).then(|| self.page.to_string()),
        }
    }

    /// The url-encoded query string for [`FilterState::to_params`], empty when
    /// nothing is selected.
    pub fn query_string(&self) -> String {
        // Only plain optional strings are serialised, which cannot fail.
        serde_urlencoded::to_string(self.to_params()).unwrap_or_default()
    }

    /// Decodes request parameters, rejecting values that cannot be interpreted.
    pub fn from_params(params: &TransactionFilterParams) -> AppResult<Self> {
        let customers = split_ids(params.customer.as_deref())
            .map(str::to_string)
            .collect::<Vec<_>>();

        let products = split_ids(params.product.as_deref())
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| {
                    AppError::InvalidFilter(format!("product id `{raw}` is not a number"))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let date = DateFilter::from_params(DateParams {
            mode: params.date_filter.as_deref(),
            date_from: params.date_from.as_deref(),
            date_to: params.date_to.as_deref(),
            month: params.month.as_deref(),
            year: params.year.as_deref(),
        })?;

        let page = match params.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw
                .parse::<i64>()
                .map(clamp_page)
                .map_err(|_| AppError::InvalidFilter(format!("page `{raw}` is not a number")))?,
        };

        let mut state = FilterState::new();
        state.set_customers(customers);
        state.set_products(products);
        state.set_date_filter(date);
        state.set_page(page as i64);
        Ok(state)
    }
}

/// Whether a customer id survives the comma-joined `customer` parameter
/// unchanged: no commas, no surrounding whitespace, not the `all` label.
pub fn is_encodable_id(id: &str) -> bool {
    !id.is_empty() && id.trim() == id && !id.contains(',') && !id.eq_ignore_ascii_case(ALL)
}

fn join<T: ToString>(ids: impl Iterator<Item = T>) -> Option<String> {
    let joined = ids.map(|id| id.to_string()).collect::<Vec<_>>().join(",");
    (!joined.is_empty()).then_some(joined)
}

/// Splits a comma-joined id list. A list containing the `all` label selects nothing.
fn split_ids(raw: Option<&str>) -> impl Iterator<Item = &str> {
    let ids: Vec<&str> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();
    let ids = if ids.contains(&ALL) { Vec::new() } else { ids };
    ids.into_iter()
}
