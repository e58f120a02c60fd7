//! Number series: prefixes, parsing, assignment, and compaction.

use uuid::Uuid;

/// A document number series.
///
/// Invoices have a single series; sale documents have one series per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    /// Invoices ("СЧ-N").
    Invoice,
    /// Cashless sales ("БН-N").
    Cashless,
    /// Cash sales ("ТЧ-N").
    Cash,
    /// Returns ("ВР-N").
    Return,
}

impl Series {
    /// Returns the number prefix for this series.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Invoice => "СЧ",
            Self::Cashless => "БН",
            Self::Cash => "ТЧ",
            Self::Return => "ВР",
        }
    }

    /// Formats a sequence value as a full document number.
    #[must_use]
    pub fn format(self, value: u32) -> String {
        format!("{}-{value}", self.prefix())
    }
}

/// Parses the trailing integer out of a stored document number.
///
/// Expects the exact format `<PREFIX>-<positive integer>` for the given
/// series. Returns `None` for any other shape; callers treat a malformed
/// number as harmless rather than failing the surrounding operation.
#[must_use]
pub fn parse_number(series: Series, number: &str) -> Option<u32> {
    let rest = number.strip_prefix(series.prefix())?.strip_prefix('-')?;
    let value: u32 = rest.parse().ok()?;
    (value > 0).then_some(value)
}

/// Computes the next number for a series from the numbers already stored.
///
/// The maximum parsed value plus one; malformed numbers count as 0, so an
/// empty or fully-malformed series starts at 1.
pub fn next_number<'a, I>(series: Series, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|n| parse_number(series, n))
        .max()
        .unwrap_or(0);
    series.format(max + 1)
}

/// Plans the renumbering that closes the gap left by a deleted document.
///
/// Given the deleted number `<PREFIX>-<K>` and the surviving `(id, number)`
/// pairs of the same series, produces `(id, new_number)` rewrites for every
/// document with parsed value `M > K`, each shifted down by one. The plan is
/// ordered ascending by `M`: the deleted document freed slot `K`, so applying
/// rewrites in that order always moves a number into the slot just vacated
/// and never collides with the unique constraint on numbers.
///
/// A malformed deleted number yields an empty plan; malformed survivors are
/// skipped.
#[must_use]
pub fn compaction_plan(
    series: Series,
    deleted_number: &str,
    survivors: &[(Uuid, String)],
) -> Vec<(Uuid, String)> {
    let Some(deleted_value) = parse_number(series, deleted_number) else {
        return Vec::new();
    };

    let mut shifts: Vec<(u32, Uuid)> = survivors
        .iter()
        .filter_map(|(id, number)| {
            let value = parse_number(series, number)?;
            (value > deleted_value).then_some((value, *id))
        })
        .collect();
    shifts.sort_unstable_by_key(|(value, _)| *value);

    shifts
        .into_iter()
        .map(|(value, id)| (id, series.format(value - 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_series_prefixes() {
        assert_eq!(Series::Invoice.prefix(), "СЧ");
        assert_eq!(Series::Cashless.prefix(), "БН");
        assert_eq!(Series::Cash.prefix(), "ТЧ");
        assert_eq!(Series::Return.prefix(), "ВР");
    }

    #[rstest]
    #[case(Series::Invoice, "СЧ-1", Some(1))]
    #[case(Series::Cash, "ТЧ-42", Some(42))]
    #[case(Series::Cash, "БН-42", None)]
    #[case(Series::Cashless, "БН-0", None)]
    #[case(Series::Return, "ВР--3", None)]
    #[case(Series::Return, "ВР-3x", None)]
    #[case(Series::Invoice, "garbage", None)]
    #[case(Series::Invoice, "", None)]
    fn test_parse_number(#[case] series: Series, #[case] input: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_number(series, input), expected);
    }

    #[test]
    fn test_next_number_empty_series_starts_at_one() {
        assert_eq!(next_number(Series::Cash, []), "ТЧ-1");
    }

    #[test]
    fn test_next_number_takes_max_plus_one() {
        let existing = ["ТЧ-1", "ТЧ-3", "ТЧ-2"];
        assert_eq!(next_number(Series::Cash, existing), "ТЧ-4");
    }

    #[test]
    fn test_next_number_tolerates_malformed() {
        // Malformed entries count as zero instead of failing the creation.
        let existing = ["ТЧ-broken", "ТЧ-2"];
        assert_eq!(next_number(Series::Cash, existing), "ТЧ-3");

        let all_malformed = ["junk", "ТЧ-"];
        assert_eq!(next_number(Series::Cash, all_malformed), "ТЧ-1");
    }

    #[test]
    fn test_compaction_shifts_later_numbers_down() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let survivors = vec![
            (a, "ТЧ-1".to_string()),
            (b, "ТЧ-3".to_string()),
        ];
        let plan = compaction_plan(Series::Cash, "ТЧ-2", &survivors);
        assert_eq!(plan, vec![(b, "ТЧ-2".to_string())]);
    }

    #[test]
    fn test_compaction_plan_is_ordered_ascending() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let survivors: Vec<(Uuid, String)> = vec![
            (ids[0], "ВР-5".to_string()),
            (ids[1], "ВР-3".to_string()),
            (ids[2], "ВР-1".to_string()),
            (ids[3], "ВР-4".to_string()),
        ];
        let plan = compaction_plan(Series::Return, "ВР-2", &survivors);
        assert_eq!(
            plan,
            vec![
                (ids[1], "ВР-2".to_string()),
                (ids[3], "ВР-3".to_string()),
                (ids[0], "ВР-4".to_string()),
            ]
        );
    }

    #[test]
    fn test_compaction_skips_malformed_survivors() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let survivors = vec![
            (a, "ТЧ-odd".to_string()),
            (b, "ТЧ-4".to_string()),
        ];
        let plan = compaction_plan(Series::Cash, "ТЧ-2", &survivors);
        assert_eq!(plan, vec![(b, "ТЧ-3".to_string())]);
    }

    #[test]
    fn test_compaction_malformed_deleted_number_is_noop() {
        let survivors = vec![(Uuid::new_v4(), "ТЧ-3".to_string())];
        assert!(compaction_plan(Series::Cash, "nonsense", &survivors).is_empty());
    }

    #[test]
    fn test_compaction_no_later_numbers_is_noop() {
        let survivors = vec![(Uuid::new_v4(), "ТЧ-1".to_string())];
        assert!(compaction_plan(Series::Cash, "ТЧ-2", &survivors).is_empty());
    }
}
