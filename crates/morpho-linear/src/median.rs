//! Median selection and two-level repeated medians.

use morpho_core::Real;

/// Index of the median of `values`.
///
/// Returns the original index of the element at zero-based sorted position
/// `floor(n / 2)`. For even `n` that is the second of the two middle elements
/// (zero-based position 2 when `n = 4`), never their average. Ties keep input order. `None` for
/// empty input.
pub fn median_index(values: &[Real]) -> Option<usize> {
    if values.is_empty() {
        return None;
    }
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    Some(order[values.len() / 2])
}

/// Median value of `values` under the [`median_index`] rule.
pub fn median(values: &[Real]) -> Option<Real> {
    median_index(values).map(|idx| values[idx])
}

/// Outcome of a two-level repeated-median reduction over landmark pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatedMedian {
    /// Outer landmark index `i*`.
    pub row: usize,
    /// Inner landmark index `j*` chosen for `i*`.
    pub col: usize,
    /// Statistic value at `(i*, j*)`.
    pub value: Real,
}

/// Two-level repeated median over a pairwise statistic.
///
/// `pairs[i][j]` holds the statistic for landmarks `i` and `j`, or `None`
/// where it is undefined (diagonal, missing landmark, zero distance). For
/// each row the median over defined entries is taken; the median of those
/// per-row medians selects the final pair. Rows without any defined entry
/// do not take part. `None` if no entry is defined at all.
pub fn repeated_median(pairs: &[Vec<Option<Real>>]) -> Option<RepeatedMedian> {
    let per_row: Vec<RepeatedMedian> = pairs
        .iter()
        .enumerate()
        .filter_map(|(row, entries)| {
            let (cols, values): (Vec<usize>, Vec<Real>) = entries
                .iter()
                .enumerate()
                .filter_map(|(col, v)| v.map(|v| (col, v)))
                .unzip();
            let k = median_index(&values)?;
            Some(RepeatedMedian {
                row,
                col: cols[k],
                value: values[k],
            })
        })
        .collect();

    let values: Vec<Real> = per_row.iter().map(|m| m.value).collect();
    median_index(&values).map(|k| per_row[k])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_index_takes_position_half_n() {
        assert_eq!(median_index(&[]), None);
        assert_eq!(median_index(&[5.0]), Some(0));
        assert_eq!(median_index(&[3.0, 1.0, 2.0]), Some(2));
        // sorted [1, 2, 3, 4]: position 2 holds 3.0 (input index 2)
        assert_eq!(median_index(&[4.0, 1.0, 3.0, 2.0]), Some(2));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(3.0));
        // sorted 1..=6, position 3 holds 4.0
        assert_eq!(median_index(&[6.0, 5.0, 4.0, 3.0, 2.0, 1.0]), Some(2));
    }

    #[test]
    fn ties_resolve_in_input_order() {
        assert_eq!(median_index(&[1.0, 1.0, 1.0]), Some(1));
        assert_eq!(median_index(&[2.0, 2.0]), Some(1));
    }

    #[test]
    fn repeated_median_ignores_undefined_entries() {
        let pairs = vec![
            vec![None, Some(1.0), Some(9.0)],
            vec![Some(1.0), None, Some(2.0)],
            vec![None, None, None],
        ];
        // row 0 -> col 2 (9.0), row 1 -> col 2 (2.0); median of [9, 2] is 9
        let m = repeated_median(&pairs).unwrap();
        assert_eq!(m, RepeatedMedian { row: 0, col: 2, value: 9.0 });

        assert_eq!(repeated_median(&[vec![None]]), None);
        assert_eq!(repeated_median(&[]), None);
    }

    #[test]
    fn outlier_row_does_not_move_the_median() {
        let good = Some(2.0);
        let pairs = vec![
            vec![None, good, good, Some(50.0)],
            vec![good, None, good, Some(40.0)],
            vec![good, good, None, Some(60.0)],
            vec![Some(50.0), Some(40.0), Some(60.0), None],
        ];
        let m = repeated_median(&pairs).unwrap();
        assert_eq!(m.value, 2.0);
    }
}
