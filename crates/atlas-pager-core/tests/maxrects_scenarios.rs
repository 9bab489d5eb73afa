use atlas_pager_core::prelude::*;

fn disjoint(rects: &[Rect]) -> bool {
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if rects[i].intersects(&rects[j]) {
                return false;
            }
        }
    }
    true
}

#[test]
fn zero_sized_page_rejects_everything() {
    let mut page = RectangleAllocator::new((0, 0), 1);
    assert!(page.free_rects().is_empty());
    assert_eq!(page.insert(1, 1), None);
    assert_eq!(page.insert(512, 512), None);

    let mut flat = RectangleAllocator::new((512, 0), 0);
    assert_eq!(flat.insert(1, 1), None);
}

#[test]
fn half_page_then_columns() {
    let mut page = RectangleAllocator::new((512, 512), 0);

    let top = page.insert(512, 256).expect("top half");
    assert_eq!(top, Rect::new(0, 0, 512, 256));
    assert_eq!(page.insert(512, 300), None);

    let mut placed = Vec::new();
    for i in 0..20 {
        let r = page
            .insert(50, 128)
            .unwrap_or_else(|| panic!("column insert {i} failed"));
        placed.push(r);
    }
    assert!(disjoint(&placed));
    assert!(placed.iter().all(|r| !r.intersects(&top)));

    let a = page.insert(12, 128).expect("first sliver");
    let b = page.insert(12, 128).expect("second sliver");
    placed.push(a);
    placed.push(b);
    placed.push(top);
    assert!(disjoint(&placed));
    assert!(
        placed
            .iter()
            .all(|r| Rect::sized(512, 512).contains(r))
    );
}

#[test]
fn padding_reserves_right_and_bottom_margin() {
    let mut page = RectangleAllocator::new((64, 64), 2);
    let a = page.insert(30, 30).expect("a");
    let b = page.insert(30, 30).expect("b");
    assert_eq!(a, Rect::new(0, 0, 30, 30));
    // b starts after a's margin, on either axis
    assert!(b.x >= 32 || b.y >= 32);
    assert!(!a.grow(2, 2).intersects(&b));
}

#[test]
fn padding_is_not_required_at_page_edge() {
    let mut page = RectangleAllocator::new((32, 32), 4);
    assert_eq!(page.insert(32, 32), Some(Rect::sized(32, 32)));
    assert_eq!(page.insert(1, 1), None);
}

#[test]
fn best_short_side_fit_prefers_snug_free_rect() {
    let mut page = RectangleAllocator::new((100, 100), 0);
    // Leaves a 100x60 band below and a 60x100 band on the right.
    page.insert(40, 40).expect("seed");
    // 60 wide matches the right band exactly; the band below would leave 20px spare.
    let r = page.insert(60, 40).expect("snug");
    assert_eq!(r, Rect::new(40, 0, 60, 40));
}

#[test]
fn degenerate_requests_are_rejected() {
    let mut page = RectangleAllocator::new((64, 64), 1);
    assert_eq!(page.insert(0, 10), None);
    assert_eq!(page.insert(10, -1), None);
    assert_eq!(page.free_rects(), &[Rect::sized(64, 64)]);
    assert_eq!(page.allocation_count(), 0);
}

#[test]
fn set_padding_applies_to_later_inserts() {
    let mut page = RectangleAllocator::new((64, 64), 0);
    page.set_padding(3);
    assert_eq!(page.padding(), 3);
    let a = page.insert(10, 64).expect("a");
    let b = page.insert(10, 64).expect("b");
    assert_eq!(a.x, 0);
    assert_eq!(b.x, 13);
}

#[test]
fn occupancy_tracks_used_area() {
    let mut page = RectangleAllocator::new((100, 100), 1);
    page.insert(50, 50).unwrap();
    assert_eq!(page.used_area(), 2500);
    assert!((page.occupancy() - 0.25).abs() < 1e-9);
    assert_eq!(page.size(), (100, 100));
}
