use smellscope_core::LineRange;

/// Merge line ranges into a minimal sorted, non-overlapping set.
///
/// Ranges that overlap or touch (next start equal to the previous end)
/// collapse into one. The input slice is copied before sorting, so the
/// caller's ordering is never disturbed.
///
/// # Examples
///
/// ```
/// use smellscope_core::LineRange;
/// use smellscope_difflens::ranges::merge_ranges;
///
/// let merged = merge_ranges(&[
///     LineRange::new(10, 15),
///     LineRange::new(12, 20),
///     LineRange::new(22, 25),
/// ]);
/// assert_eq!(merged, vec![LineRange::new(10, 20), LineRange::new(22, 25)]);
/// ```
pub fn merge_ranges(ranges: &[LineRange]) -> Vec<LineRange> {
    if ranges.is_empty() {
        return Vec::new();
    }

    let mut sorted = ranges.to_vec();
    sorted.sort_by_key(|r| r.start);

    let mut merged: Vec<LineRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(pairs: &[(u32, u32)]) -> Vec<LineRange> {
        pairs.iter().map(|&(s, e)| LineRange::new(s, e)).collect()
    }

    #[test]
    fn empty_input_returns_empty_vec() {
        assert!(merge_ranges(&[]).is_empty());
    }

    #[test]
    fn overlapping_ranges_collapse() {
        let merged = merge_ranges(&ranges(&[(10, 15), (12, 20), (22, 25)]));
        assert_eq!(merged, ranges(&[(10, 20), (22, 25)]));
    }

    #[test]
    fn touching_ranges_collapse() {
        // (10,15) and (15,20) share line 15.
        let merged = merge_ranges(&ranges(&[(10, 15), (15, 20)]));
        assert_eq!(merged, ranges(&[(10, 20)]));
    }

    #[test]
    fn gap_of_one_line_stays_split() {
        let merged = merge_ranges(&ranges(&[(10, 15), (16, 20)]));
        assert_eq!(merged, ranges(&[(10, 15), (16, 20)]));
    }

    #[test]
    fn unsorted_input_is_handled() {
        let merged = merge_ranges(&ranges(&[(22, 25), (10, 15), (12, 20)]));
        assert_eq!(merged, ranges(&[(10, 20), (22, 25)]));
    }

    #[test]
    fn contained_range_is_absorbed() {
        let merged = merge_ranges(&ranges(&[(10, 30), (15, 20)]));
        assert_eq!(merged, ranges(&[(10, 30)]));
    }

    #[test]
    fn single_range_passes_through() {
        let merged = merge_ranges(&ranges(&[(7, 7)]));
        assert_eq!(merged, ranges(&[(7, 7)]));
    }

    #[test]
    fn caller_slice_is_not_mutated() {
        let input = ranges(&[(22, 25), (10, 15)]);
        let snapshot = input.clone();
        let _ = merge_ranges(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn output_is_sorted_and_disjoint() {
        let merged = merge_ranges(&ranges(&[(40, 45), (1, 3), (2, 8), (44, 50), (20, 20)]));
        for pair in merged.windows(2) {
            assert!(pair[0].end < pair[1].start, "{} vs {}", pair[0], pair[1]);
        }
        assert_eq!(merged, ranges(&[(1, 8), (20, 20), (40, 50)]));
    }

    #[test]
    fn line_coverage_is_preserved() {
        let input = ranges(&[(10, 15), (12, 20), (22, 25), (3, 3)]);
        let merged = merge_ranges(&input);

        let covered = |set: &[LineRange], line: u32| set.iter().any(|r| r.start <= line && line <= r.end);
        for line in 1..=30 {
            assert_eq!(
                covered(&input, line),
                covered(&merged, line),
                "coverage changed at line {line}"
            );
        }
    }
}
