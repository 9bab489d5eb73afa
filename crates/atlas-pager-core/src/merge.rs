//! Pre-pass folding overlapping source regions into shared packing units.
//!
//! Two regions are merged when packing their bounding box costs no more area than
//! packing both separately: `area(a) + area(b) >= area(a ∪ b)`.

use crate::model::Rect;

/// True if `a` and `b` overlap enough to be packed as their enclosing rectangle.
pub fn sufficient_overlap(a: &Rect, b: &Rect) -> bool {
    a.area() + b.area() >= a.combine(b).area()
}

/// Merges rectangles in place until no pair satisfies [`sufficient_overlap`].
/// Absorbed rectangles are swap-removed, so the output order differs from the input.
pub fn merge_overlapping(rects: &mut Vec<Rect>) {
    let mut merged_any = true;
    while merged_any {
        merged_any = false;
        let mut i = 0;
        while i < rects.len() {
            // A grown cursor may now absorb rectangles it skipped earlier.
            while absorb_into(rects, i) {
                merged_any = true;
            }
            i += 1;
        }
    }
}

/// Returns the merged set, leaving `rects` untouched.
pub fn merged(rects: &[Rect]) -> Vec<Rect> {
    let mut out = rects.to_vec();
    merge_overlapping(&mut out);
    out
}

fn absorb_into(rects: &mut Vec<Rect>, cursor: usize) -> bool {
    let mut absorbed = false;
    let mut j = cursor + 1;
    while j < rects.len() {
        if sufficient_overlap(&rects[cursor], &rects[j]) {
            rects[cursor] = rects[cursor].combine(&rects[j]);
            rects.swap_remove(j);
            absorbed = true;
        } else {
            j += 1;
        }
    }
    absorbed
}
