//! Property tests for the stock adjustment rule.

use proptest::prelude::*;
use uuid::Uuid;

use super::adjustment::StockService;

#[derive(Debug, Clone)]
enum StockOp {
    Sell(i32),
    EditSale { index: usize, new_quantity: i32 },
    DeleteSale(usize),
}

fn stock_op() -> impl Strategy<Value = StockOp> {
    prop_oneof![
        3 => (1i32..10).prop_map(StockOp::Sell),
        1 => (any::<usize>(), 1i32..10)
            .prop_map(|(index, new_quantity)| StockOp::EditSale { index, new_quantity }),
        1 => any::<usize>().prop_map(StockOp::DeleteSale),
    ]
}

proptest! {
    /// Whatever sequence of item creates/edits/deletes is attempted, the
    /// on-hand count never goes negative and always equals the initial stock
    /// minus what the surviving items hold.
    #[test]
    fn on_hand_never_negative(
        initial in 0i32..50,
        ops in proptest::collection::vec(stock_op(), 0..40),
    ) {
        let product_id = Uuid::new_v4();
        let mut on_hand = initial;
        let mut items: Vec<i32> = Vec::new();

        for op in ops {
            match op {
                StockOp::Sell(quantity) => {
                    if let Ok(next) = StockService::apply_sale_item(product_id, on_hand, quantity) {
                        on_hand = next;
                        items.push(quantity);
                    }
                }
                StockOp::EditSale { index, new_quantity } => {
                    if items.is_empty() {
                        continue;
                    }
                    let index = index % items.len();
                    if let Ok(next) = StockService::change_sale_item(
                        product_id,
                        on_hand,
                        items[index],
                        new_quantity,
                    ) {
                        on_hand = next;
                        items[index] = new_quantity;
                    }
                }
                StockOp::DeleteSale(index) => {
                    if items.is_empty() {
                        continue;
                    }
                    let quantity = items.remove(index % items.len());
                    on_hand = StockService::revert_sale_item(on_hand, quantity);
                }
            }

            prop_assert!(on_hand >= 0);
            let held: i32 = items.iter().sum();
            prop_assert_eq!(on_hand + held, initial);
        }
    }

    /// A return bounded by the original sale can never push a revert below
    /// zero as long as nothing else drained the stock in between.
    #[test]
    fn return_then_revert_roundtrips(
        on_hand in 0i32..50,
        sold in 1i32..20,
        requested in 1i32..20,
    ) {
        let product_id = Uuid::new_v4();
        let outcome = StockService::apply_return_item(product_id, on_hand, requested, Some(sold));
        if requested <= sold {
            let credited = outcome.unwrap();
            prop_assert_eq!(credited, on_hand + requested);
            let reverted = StockService::revert_return_item(product_id, credited, requested).unwrap();
            prop_assert_eq!(reverted, on_hand);
        } else {
            prop_assert!(outcome.is_err());
        }
    }
}
