//! Order/return totals over a set of transactions.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::TransactionWithRelations,
};

/// The four sums reported next to every transaction listing.
///
/// Always computed over the whole filtered set, never over a single page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_order: i64,
    pub total_return: i64,
    pub total_billed: i64,
    pub total_returned: i64,
}

impl Totals {
    /// Adds one row. Null quantities and a missing product price count as zero.
    ///
    /// Fails without touching `self` when any sum leaves the `i64` range.
    pub fn add(
        &mut self,
        order_qty: Option<i32>,
        return_qty: Option<i32>,
        price: Option<i64>,
    ) -> AppResult<()> {
        let order_qty = i64::from(order_qty.unwrap_or(0));
        let return_qty = i64::from(return_qty.unwrap_or(0));
        let price = price.unwrap_or(0);

        let billed = order_qty.checked_mul(price).ok_or_else(overflow)?;
        let returned = return_qty.checked_mul(price).ok_or_else(overflow)?;

        *self = Totals {
            total_order: self.total_order.checked_add(order_qty).ok_or_else(overflow)?,
            total_return: self.total_return.checked_add(return_qty).ok_or_else(overflow)?,
            total_billed: self.total_billed.checked_add(billed).ok_or_else(overflow)?,
            total_returned: self.total_returned.checked_add(returned).ok_or_else(overflow)?,
        };
        Ok(())
    }

    pub fn from_rows<'a, I>(rows: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = &'a TransactionWithRelations>,
    {
        rows.into_iter().try_fold(Totals::default(), |mut totals, row| {
            totals.add(
                row.transaction.order_qty,
                row.transaction.return_qty,
                row.product.as_ref().and_then(|p| p.price),
            )?;
            Ok(totals)
        })
    }
}

fn overflow() -> AppError {
    AppError::Internal(anyhow::anyhow!("transaction totals exceed the i64 range"))
}

#[cfg(test)]
mod tests {
    use super::Totals;
    use crate::error::AppError;

    #[test]
    fn one_row_contributes_quantities_and_amounts() {
        let mut totals = Totals::default();
        totals.add(Some(5), Some(2), Some(1000)).unwrap();

        assert_eq!(
            totals,
            Totals {
                total_order: 5,
                total_return: 2,
                total_billed: 5000,
                total_returned: 2000,
            }
        );
    }

    #[test]
    fn nulls_count_as_zero() {
        let mut totals = Totals::default();
        totals.add(None, Some(3), None).unwrap();
        totals.add(Some(4), None, Some(250)).unwrap();

        assert_eq!(totals.total_order, 4);
        assert_eq!(totals.total_return, 3);
        assert_eq!(totals.total_billed, 1000);
        assert_eq!(totals.total_returned, 0);
    }

    #[test]
    fn overflowing_amount_is_an_error_and_leaves_totals_unchanged() {
        let mut totals = Totals::default();
        totals.add(Some(1), None, Some(10)).unwrap();

        let err = totals
            .add(Some(1_000_000), None, Some(10_000_000_000_000))
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(totals.total_order, 1);
        assert_eq!(totals.total_billed, 10);
    }

    #[test]
    fn overflowing_running_sum_is_an_error() {
        let mut totals = Totals::default();
        totals.add(Some(1), None, Some(i64::MAX)).unwrap();
        assert!(totals.add(Some(1), None, Some(1)).is_err());
    }
}
