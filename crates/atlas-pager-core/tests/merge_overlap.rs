use atlas_pager_core::merged;
use atlas_pager_core::prelude::*;

#[test]
fn half_overlapping_pair_merges() {
    let a = Rect::new(0, 0, 100, 100);
    let b = Rect::new(50, 0, 100, 100);
    assert!(sufficient_overlap(&a, &b));
    let mut v = vec![a, b];
    merge_overlapping(&mut v);
    assert_eq!(v, vec![Rect::new(0, 0, 150, 100)]);
}

#[test]
fn disjoint_pair_stays_separate() {
    let a = Rect::new(0, 0, 10, 10);
    let b = Rect::new(1000, 1000, 10, 10);
    assert!(!sufficient_overlap(&a, &b));
    let mut v = vec![a, b];
    merge_overlapping(&mut v);
    assert_eq!(v.len(), 2);
    assert!(v.contains(&a) && v.contains(&b));
}

#[test]
fn row_of_neighbours_collapses() {
    let mut v = vec![
        Rect::new(0, 0, 10, 10),
        Rect::new(10, 0, 10, 10),
        Rect::new(20, 0, 10, 10),
    ];
    merge_overlapping(&mut v);
    assert_eq!(v, vec![Rect::new(0, 0, 30, 10)]);
}

#[test]
fn grown_cursor_absorbs_rect_it_skipped() {
    // The first rect cannot take the second until it has absorbed the third.
    let mut v = vec![
        Rect::new(0, 20, 10, 10),
        Rect::new(0, 0, 10, 10),
        Rect::new(0, 10, 10, 10),
    ];
    merge_overlapping(&mut v);
    assert_eq!(v, vec![Rect::new(0, 0, 10, 30)]);
}

#[test]
fn later_growth_reaches_earlier_cursor() {
    // Nothing merges into the first rect on the first pass; a later merge makes it eligible.
    let mut v = vec![
        Rect::new(0, 0, 20, 20),
        Rect::new(20, 0, 10, 10),
        Rect::new(20, 10, 10, 10),
    ];
    merge_overlapping(&mut v);
    assert_eq!(v, vec![Rect::new(0, 0, 30, 20)]);
}

#[test]
fn merge_never_loses_coverage() {
    let input = vec![
        Rect::new(0, 0, 64, 64),
        Rect::new(32, 32, 64, 64),
        Rect::new(200, 0, 16, 16),
        Rect::new(204, 4, 8, 8),
        Rect::new(500, 500, 40, 10),
        Rect::new(530, 505, 40, 10),
    ];
    let out = merged(&input);
    assert!(out.len() < input.len());
    for r in &input {
        assert!(out.iter().any(|m| m.contains(r)), "{r:?} not covered");
    }
    for i in 0..out.len() {
        for j in (i + 1)..out.len() {
            assert!(!sufficient_overlap(&out[i], &out[j]));
        }
    }
    // input untouched
    assert_eq!(input.len(), 6);
}

#[test]
fn empty_and_single_inputs() {
    let mut none: Vec<Rect> = Vec::new();
    merge_overlapping(&mut none);
    assert!(none.is_empty());

    let mut one = vec![Rect::new(3, 4, 5, 6)];
    merge_overlapping(&mut one);
    assert_eq!(one, vec![Rect::new(3, 4, 5, 6)]);
}
