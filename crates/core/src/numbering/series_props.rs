//! Property tests for number series assignment and compaction.

use proptest::prelude::*;
use uuid::Uuid;

use super::series::{Series, compaction_plan, next_number, parse_number};

/// Replays a sequence of create/delete operations against an in-memory
/// series, the way the repository layer drives the rule.
fn replay(ops: &[SeriesOp]) -> Vec<(Uuid, String)> {
    let mut docs: Vec<(Uuid, String)> = Vec::new();

    for op in ops {
        match op {
            SeriesOp::Create => {
                let number = next_number(Series::Cash, docs.iter().map(|(_, n)| n.as_str()));
                docs.push((Uuid::new_v4(), number));
            }
            SeriesOp::Delete(index) => {
                if docs.is_empty() {
                    continue;
                }
                let victim = docs.remove(index % docs.len());
                let plan = compaction_plan(Series::Cash, &victim.1, &docs);
                for (id, new_number) in plan {
                    if let Some(doc) = docs.iter_mut().find(|(doc_id, _)| *doc_id == id) {
                        doc.1 = new_number;
                    }
                }
            }
        }
    }

    docs
}

#[derive(Debug, Clone)]
enum SeriesOp {
    Create,
    Delete(usize),
}

fn series_op() -> impl Strategy<Value = SeriesOp> {
    prop_oneof![
        3 => Just(SeriesOp::Create),
        1 => any::<usize>().prop_map(SeriesOp::Delete),
    ]
}

proptest! {
    /// After any sequence of creates and deletes, the surviving numbers are
    /// exactly the dense run 1..=N.
    #[test]
    fn numbers_stay_gapless(ops in proptest::collection::vec(series_op(), 0..40)) {
        let docs = replay(&ops);

        let mut values: Vec<u32> = docs
            .iter()
            .filter_map(|(_, n)| parse_number(Series::Cash, n))
            .collect();
        values.sort_unstable();

        let expected: Vec<u32> = (1..=u32::try_from(docs.len()).unwrap()).collect();
        prop_assert_eq!(values, expected);
    }

    /// Formatting and parsing round-trip for every series.
    #[test]
    fn format_parse_roundtrip(value in 1u32..1_000_000) {
        for series in [Series::Invoice, Series::Cashless, Series::Cash, Series::Return] {
            prop_assert_eq!(parse_number(series, &series.format(value)), Some(value));
        }
    }
}
