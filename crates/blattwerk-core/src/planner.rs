// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Split-point planner — turns a split mode plus the user's free-text input into
// an ordered boundary list and the page segments it implies.
//
// Pure and synchronous. Malformed input is never an error here: bad tokens are
// ignored and bad numbers fall back to a default, so the caller always gets a
// usable plan.

use std::collections::BTreeSet;

use crate::types::{Boundaries, Segment, SplitMode, SplitPlan};

/// Compute the cut points for `page_count` pages under `mode`.
///
/// Every returned boundary `b` satisfies `0 < b < page_count`; the list is
/// strictly increasing. A zero-page document always yields no boundaries.
pub fn compute_boundaries(page_count: u32, mode: SplitMode, specification: &str) -> Boundaries {
    if page_count == 0 {
        return Boundaries::empty();
    }

    match mode {
        SplitMode::AfterPage => {
            let page = positive_or_one(specification);
            let clamped = page.min(u64::from(page_count)) as u32;
            // Clamping to page_count lands on the trailing edge, which is dropped.
            Boundaries::from_points(page_count, [clamped])
        }
        SplitMode::EveryN => {
            let step = positive_or_one(specification);
            if step >= u64::from(page_count) {
                return Boundaries::empty();
            }
            let step = step as usize;
            Boundaries::from_points(page_count, (step as u32..page_count).step_by(step))
        }
        SplitMode::Ranges => parse_ranges(page_count, specification),
    }
}

/// Turn a boundary list into contiguous half-open segments covering
/// `[0, page_count)`.
///
/// Points that would produce an empty or out-of-order segment (`0`, anything
/// `>= page_count`, or anything not above the previous point) are skipped, so
/// the result is a partition for any input.
pub fn derive_segments(page_count: u32, boundaries: &[u32]) -> Vec<Segment> {
    if page_count == 0 {
        return Vec::new();
    }

    let mut segments = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0u32;
    for &cut in boundaries {
        if cut <= start || cut >= page_count {
            continue;
        }
        segments.push(Segment::new(start, cut));
        start = cut;
    }
    segments.push(Segment::new(start, page_count));
    segments
}

/// Run both planning steps and bundle the result.
pub fn plan(page_count: u32, mode: SplitMode, specification: &str) -> SplitPlan {
    let boundaries = compute_boundaries(page_count, mode, specification);
    let segments = derive_segments(page_count, boundaries.as_slice());
    SplitPlan {
        page_count,
        mode,
        boundaries,
        segments,
    }
}

// -- Parsing helpers ----------------------------------------------------------

/// Parse a comma-separated list of pages and inclusive ranges.
fn parse_ranges(page_count: u32, specification: &str) -> Boundaries {
    if specification.trim().is_empty() {
        return Boundaries::empty();
    }

    let limit = i64::from(page_count);
    let mut points: BTreeSet<u32> = BTreeSet::new();

    for token in specification.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if token.contains('-') {
            // Only the first two fields count: "1-3-5" reads as 1-3.
            let mut fields = token.split('-');
            let (Some(start), Some(end)) = (
                fields.next().and_then(range_bound),
                fields.next().and_then(range_bound),
            ) else {
                continue;
            };
            // Pages at or past the total never form a boundary.
            let last = end.min(limit - 1);
            let first = start.max(1);
            if first <= last {
                points.extend((first..=last).map(|p| p as u32));
            }
        } else if let Ok(page) = token.parse::<i64>() {
            if page >= 1 && page < limit {
                points.insert(page as u32);
            }
        }
    }

    Boundaries::from_points(page_count, points)
}

/// One side of a `start-end` token. A blank side reads as 0.
fn range_bound(field: &str) -> Option<i64> {
    let field = field.trim();
    if field.is_empty() {
        Some(0)
    } else {
        field.parse().ok()
    }
}

/// Lenient integer read used by the numeric inputs: optional leading
/// whitespace and sign, then leading digits; trailing text is ignored.
/// Anything unparseable or below 1 becomes 1.
fn positive_or_one(input: &str) -> u64 {
    match parse_leading_int(input) {
        Some(value) if value >= 1 => value as u64,
        _ => 1,
    }
}

fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Overlong digit runs saturate rather than fail.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: u32, end: u32) -> Segment {
        Segment::new(start, end)
    }

    fn assert_partition(page_count: u32, segments: &[Segment]) {
        if page_count == 0 {
            assert!(segments.is_empty());
            return;
        }
        assert_eq!(segments.first().map(|s| s.start), Some(0));
        assert_eq!(segments.last().map(|s| s.end), Some(page_count));
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(segments.iter().all(|s| !s.is_empty()));
    }

    // -- Scenarios ------------------------------------------------------------

    #[test]
    fn after_page_splits_once() {
        let p = plan(10, SplitMode::AfterPage, "3");
        assert_eq!(p.boundaries.as_slice(), &[3]);
        assert_eq!(p.segments, vec![seg(0, 3), seg(3, 10)]);
    }

    #[test]
    fn every_n_splits_periodically() {
        let p = plan(10, SplitMode::EveryN, "4");
        assert_eq!(p.boundaries.as_slice(), &[4, 8]);
        assert_eq!(p.segments, vec![seg(0, 4), seg(4, 8), seg(8, 10)]);
    }

    #[test]
    fn ranges_expand_and_sort() {
        let p = plan(10, SplitMode::Ranges, "1-3,5,7-9");
        assert_eq!(p.boundaries.as_slice(), &[1, 2, 3, 5, 7, 8, 9]);
        assert_eq!(p.segments.len(), 8);
        assert_partition(10, &p.segments);
    }

    #[test]
    fn blank_ranges_keep_whole_document() {
        let p = plan(5, SplitMode::Ranges, "   ");
        assert!(p.boundaries.is_empty());
        assert_eq!(p.segments, vec![seg(0, 5)]);
    }

    #[test]
    fn zero_pages_yield_nothing() {
        for mode in [SplitMode::AfterPage, SplitMode::EveryN, SplitMode::Ranges] {
            let p = plan(0, mode, "2");
            assert!(p.boundaries.is_empty(), "{mode}");
            assert!(p.segments.is_empty(), "{mode}");
        }
    }

    #[test]
    fn every_n_at_or_above_page_count_is_one_segment() {
        let p = plan(5, SplitMode::EveryN, "10");
        assert!(p.boundaries.is_empty());
        assert_eq!(p.segments, vec![seg(0, 5)]);

        let p = plan(5, SplitMode::EveryN, "5");
        assert!(p.boundaries.is_empty());
    }

    // -- Defaults and clamping ------------------------------------------------

    #[test]
    fn after_page_defaults_to_one() {
        for input in ["", "abc", "0", "-4"] {
            let b = compute_boundaries(6, SplitMode::AfterPage, input);
            assert_eq!(b.as_slice(), &[1], "input {input:?}");
        }
    }

    #[test]
    fn after_page_reads_leading_digits() {
        assert_eq!(compute_boundaries(10, SplitMode::AfterPage, " 4pages").as_slice(), &[4]);
        assert_eq!(compute_boundaries(10, SplitMode::AfterPage, "2.9").as_slice(), &[2]);
    }

    #[test]
    fn after_page_clamped_to_end_drops_boundary() {
        let p = plan(5, SplitMode::AfterPage, "9");
        assert!(p.boundaries.is_empty());
        assert_eq!(p.segments, vec![seg(0, 5)]);
    }

    #[test]
    fn single_page_document_cannot_split() {
        for mode in [SplitMode::AfterPage, SplitMode::EveryN, SplitMode::Ranges] {
            let p = plan(1, mode, "1");
            assert!(p.boundaries.is_empty(), "{mode}");
            assert_eq!(p.segments, vec![seg(0, 1)]);
        }
    }

    #[test]
    fn every_n_defaults_to_one() {
        let b = compute_boundaries(4, SplitMode::EveryN, "zero");
        assert_eq!(b.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn huge_numbers_do_not_overflow() {
        let b = compute_boundaries(7, SplitMode::AfterPage, "99999999999999999999999");
        assert!(b.is_empty());
        let b = compute_boundaries(7, SplitMode::EveryN, "99999999999999999999999");
        assert!(b.is_empty());
        let b = compute_boundaries(7, SplitMode::Ranges, "2-99999999999");
        assert_eq!(b.as_slice(), &[2, 3, 4, 5, 6]);
    }

    // -- Range parsing edge cases ---------------------------------------------

    #[test]
    fn ranges_exclude_page_count_and_beyond() {
        let b = compute_boundaries(5, SplitMode::Ranges, "4-8,5,6");
        assert_eq!(b.as_slice(), &[4]);
    }

    #[test]
    fn ranges_drop_zero_and_negative_pages() {
        let b = compute_boundaries(6, SplitMode::Ranges, "0-2,0,-1");
        assert_eq!(b.as_slice(), &[1, 2]);
    }

    #[test]
    fn ranges_ignore_malformed_tokens() {
        let b = compute_boundaries(10, SplitMode::Ranges, "abc, 2 ,,3-x,x-4,2.5, 6 - 7 ");
        assert_eq!(b.as_slice(), &[2, 6, 7]);
    }

    #[test]
    fn blank_range_side_reads_as_zero() {
        assert_eq!(compute_boundaries(10, SplitMode::Ranges, "-3").as_slice(), &[1, 2, 3]);
        assert!(compute_boundaries(10, SplitMode::Ranges, "3-").is_empty());
    }

    #[test]
    fn extra_range_fields_are_ignored() {
        assert_eq!(compute_boundaries(10, SplitMode::Ranges, "1-3-5").as_slice(), &[1, 2, 3]);
        assert_eq!(compute_boundaries(10, SplitMode::Ranges, "8-9-x").as_slice(), &[8, 9]);
    }

    #[test]
    fn reversed_range_contributes_nothing() {
        let b = compute_boundaries(10, SplitMode::Ranges, "7-3,1");
        assert_eq!(b.as_slice(), &[1]);
    }

    #[test]
    fn overlapping_ranges_are_deduplicated() {
        let b = compute_boundaries(10, SplitMode::Ranges, "2-5,4-6,5");
        assert_eq!(b.as_slice(), &[2, 3, 4, 5, 6]);
    }

    // -- derive_segments ------------------------------------------------------

    #[test]
    fn derive_segments_tolerates_empty_list() {
        assert_eq!(derive_segments(5, &[]), vec![seg(0, 5)]);
        assert!(derive_segments(0, &[]).is_empty());
    }

    #[test]
    fn derive_segments_skips_collapsing_points() {
        let segments = derive_segments(6, &[0, 2, 2, 1, 4, 6, 9]);
        assert_eq!(segments, vec![seg(0, 2), seg(2, 4), seg(4, 6)]);
    }

    // -- Properties -----------------------------------------------------------

    #[test]
    fn boundaries_always_inside_and_increasing() {
        let specs = [
            "", "0", "1", "2", "3", "7", "100", "-3", "x", "1-3,5,7-9", "0-100", "5,4,3,2,1",
            "3-1", " , ,", "2-2", "1-1,1-1",
        ];
        for page_count in 0..25 {
            for mode in [SplitMode::AfterPage, SplitMode::EveryN, SplitMode::Ranges] {
                for spec in specs {
                    let b = compute_boundaries(page_count, mode, spec);
                    assert!(
                        b.as_slice().iter().all(|&x| x > 0 && x < page_count),
                        "out of range: {page_count} {mode} {spec:?} -> {b:?}"
                    );
                    assert!(
                        b.as_slice().windows(2).all(|w| w[0] < w[1]),
                        "not strictly increasing: {page_count} {mode} {spec:?} -> {b:?}"
                    );
                    let segments = derive_segments(page_count, b.as_slice());
                    assert_partition(page_count, &segments);
                    assert_eq!(segments.len(), if page_count == 0 { 0 } else { b.len() + 1 });
                }
            }
        }
    }

    #[test]
    fn planning_is_idempotent() {
        let first = plan(42, SplitMode::Ranges, "3-9,12,40-50");
        let second = plan(42, SplitMode::Ranges, "3-9,12,40-50");
        assert_eq!(first, second);
    }
}
