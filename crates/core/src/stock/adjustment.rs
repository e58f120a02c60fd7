//! Stock level arithmetic for line item mutations.

use uuid::Uuid;

use super::error::StockError;

/// Stock adjustment service.
///
/// Pure functions from the current on-hand count (and, for returns, the
/// original sale context) to the new on-hand count. No I/O; the repository
/// layer reads the count, calls in here, and writes the result back inside
/// the same transaction as the item row.
pub struct StockService;

impl StockService {
    /// Applies a new sale line (invoice item or cash/cashless document item).
    ///
    /// # Errors
    ///
    /// `QuantityNotPositive` when `requested < 1`; `InsufficientStock` when
    /// the request exceeds the on-hand count.
    pub fn apply_sale_item(
        product_id: Uuid,
        on_hand: i32,
        requested: i32,
    ) -> Result<i32, StockError> {
        Self::require_positive(requested)?;
        if requested > on_hand {
            return Err(StockError::InsufficientStock {
                product_id,
                requested,
                available: on_hand,
            });
        }
        Ok(on_hand - requested)
    }

    /// Reverses a sale line, returning its quantity to stock.
    #[must_use]
    pub fn revert_sale_item(on_hand: i32, quantity: i32) -> i32 {
        on_hand + quantity
    }

    /// Applies a new return line.
    ///
    /// `sold` is the quantity of the same product on the original sale, or
    /// `None` when the product does not appear there at all.
    ///
    /// # Errors
    ///
    /// `QuantityNotPositive`, `ProductNotOnOriginalSale`, or
    /// `ReturnExceedsSoldQuantity`.
    pub fn apply_return_item(
        product_id: Uuid,
        on_hand: i32,
        requested: i32,
        sold: Option<i32>,
    ) -> Result<i32, StockError> {
        Self::require_positive(requested)?;
        let sold = sold.ok_or(StockError::ProductNotOnOriginalSale { product_id })?;
        if requested > sold {
            return Err(StockError::ReturnExceedsSoldQuantity {
                product_id,
                requested,
                sold,
            });
        }
        Ok(on_hand + requested)
    }

    /// Reverses a return line, removing the previously credited quantity.
    ///
    /// # Errors
    ///
    /// `RevertBelowZero` when the credited stock has already been sold on and
    /// removing it would leave a negative count.
    pub fn revert_return_item(
        product_id: Uuid,
        on_hand: i32,
        quantity: i32,
    ) -> Result<i32, StockError> {
        if quantity > on_hand {
            return Err(StockError::RevertBelowZero {
                product_id,
                available: on_hand,
            });
        }
        Ok(on_hand - quantity)
    }

    /// Edits a sale line quantity: reversal of the old effect, then a fresh
    /// apply of the new one, computed as a single step.
    ///
    /// # Errors
    ///
    /// Same as [`Self::apply_sale_item`], validated against the count with
    /// the old quantity already released.
    pub fn change_sale_item(
        product_id: Uuid,
        on_hand: i32,
        old_quantity: i32,
        new_quantity: i32,
    ) -> Result<i32, StockError> {
        let released = Self::revert_sale_item(on_hand, old_quantity);
        Self::apply_sale_item(product_id, released, new_quantity)
    }

    /// Edits a return line quantity: reversal, then a fresh apply.
    ///
    /// # Errors
    ///
    /// Same as [`Self::revert_return_item`] and [`Self::apply_return_item`].
    pub fn change_return_item(
        product_id: Uuid,
        on_hand: i32,
        old_quantity: i32,
        new_quantity: i32,
        sold: Option<i32>,
    ) -> Result<i32, StockError> {
        let released = Self::revert_return_item(product_id, on_hand, old_quantity)?;
        Self::apply_return_item(product_id, released, new_quantity, sold)
    }

    fn require_positive(requested: i32) -> Result<(), StockError> {
        if requested < 1 {
            return Err(StockError::QuantityNotPositive(requested));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn test_apply_sale_item_decrements() {
        assert_eq!(StockService::apply_sale_item(pid(), 10, 3).unwrap(), 7);
    }

    #[test]
    fn test_apply_sale_item_exact_stock() {
        assert_eq!(StockService::apply_sale_item(pid(), 3, 3).unwrap(), 0);
    }

    #[test]
    fn test_apply_sale_item_insufficient() {
        let product_id = pid();
        let result = StockService::apply_sale_item(product_id, 2, 3);
        assert_eq!(
            result,
            Err(StockError::InsufficientStock {
                product_id,
                requested: 3,
                available: 2,
            })
        );
    }

    #[test]
    fn test_apply_sale_item_rejects_non_positive() {
        assert_eq!(
            StockService::apply_sale_item(pid(), 10, 0),
            Err(StockError::QuantityNotPositive(0))
        );
        assert_eq!(
            StockService::apply_sale_item(pid(), 10, -4),
            Err(StockError::QuantityNotPositive(-4))
        );
    }

    #[test]
    fn test_revert_sale_item_credits_back() {
        assert_eq!(StockService::revert_sale_item(7, 3), 10);
    }

    #[test]
    fn test_apply_return_item_increments() {
        assert_eq!(
            StockService::apply_return_item(pid(), 7, 2, Some(3)).unwrap(),
            9
        );
    }

    #[test]
    fn test_apply_return_item_full_quantity() {
        assert_eq!(
            StockService::apply_return_item(pid(), 7, 3, Some(3)).unwrap(),
            10
        );
    }

    #[test]
    fn test_apply_return_item_product_not_on_sale() {
        let product_id = pid();
        assert_eq!(
            StockService::apply_return_item(product_id, 7, 1, None),
            Err(StockError::ProductNotOnOriginalSale { product_id })
        );
    }

    #[test]
    fn test_apply_return_item_exceeds_sold() {
        let product_id = pid();
        assert_eq!(
            StockService::apply_return_item(product_id, 7, 4, Some(3)),
            Err(StockError::ReturnExceedsSoldQuantity {
                product_id,
                requested: 4,
                sold: 3,
            })
        );
    }

    #[test]
    fn test_revert_return_item_removes_credit() {
        assert_eq!(StockService::revert_return_item(pid(), 9, 2).unwrap(), 7);
    }

    #[test]
    fn test_revert_return_item_guards_negative() {
        let product_id = pid();
        assert_eq!(
            StockService::revert_return_item(product_id, 1, 2),
            Err(StockError::RevertBelowZero {
                product_id,
                available: 1,
            })
        );
    }

    #[test]
    fn test_change_sale_item_shrink() {
        // 10 on hand, item was 3 (so 13 unreserved), now wants 1.
        assert_eq!(
            StockService::change_sale_item(pid(), 10, 3, 1).unwrap(),
            12
        );
    }

    #[test]
    fn test_change_sale_item_grow_within_stock() {
        assert_eq!(StockService::change_sale_item(pid(), 10, 3, 13).unwrap(), 0);
    }

    #[test]
    fn test_change_sale_item_grow_beyond_stock() {
        let product_id = pid();
        assert_eq!(
            StockService::change_sale_item(product_id, 10, 3, 14),
            Err(StockError::InsufficientStock {
                product_id,
                requested: 14,
                available: 13,
            })
        );
    }

    #[test]
    fn test_change_return_item() {
        // 9 on hand after a return of 2; change the return to 3 of 3 sold.
        assert_eq!(
            StockService::change_return_item(pid(), 9, 2, 3, Some(3)).unwrap(),
            10
        );
    }

    #[test]
    fn test_change_return_item_exceeds_sold() {
        let product_id = pid();
        assert_eq!(
            StockService::change_return_item(product_id, 9, 2, 4, Some(3)),
            Err(StockError::ReturnExceedsSoldQuantity {
                product_id,
                requested: 4,
                sold: 3,
            })
        );
    }
}
