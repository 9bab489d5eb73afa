use crate::model::Rect;
use tinyvec::ArrayVec;

/// Single-page MaxRects allocator with best-short-side-fit placement.
///
/// The free list is a plain `Vec` so identical call sequences always yield identical
/// placements. Every placement reserves `padding` extra pixels to its right and below.
#[derive(Debug, Clone)]
pub struct RectangleAllocator {
    size: (i32, i32),
    padding: i32,
    free: Vec<Rect>,
    used_area: u64,
    allocations: usize,
}

impl RectangleAllocator {
    pub fn new(size: (i32, i32), padding: i32) -> Self {
        Self {
            size,
            padding,
            free: Self::initial_free(size),
            used_area: 0,
            allocations: 0,
        }
    }

    fn initial_free(size: (i32, i32)) -> Vec<Rect> {
        if size.0 <= 0 || size.1 <= 0 {
            Vec::new()
        } else {
            vec![Rect::sized(size.0, size.1)]
        }
    }

    pub fn size(&self) -> (i32, i32) {
        self.size
    }

    pub fn padding(&self) -> i32 {
        self.padding
    }

    /// Only affects later inserts; call before the first one.
    pub fn set_padding(&mut self, padding: i32) {
        self.padding = padding;
    }

    /// Forgets every placement and restores the full-page free rectangle.
    pub fn clear(&mut self) {
        self.free = Self::initial_free(self.size);
        self.used_area = 0;
        self.allocations = 0;
    }

    pub fn free_rects(&self) -> &[Rect] {
        &self.free
    }

    pub fn used_area(&self) -> u64 {
        self.used_area
    }

    pub fn allocation_count(&self) -> usize {
        self.allocations
    }

    /// Placed area over page area (0.0 for an empty page).
    pub fn occupancy(&self) -> f64 {
        let total = (self.size.0.max(0) as u64) * (self.size.1.max(0) as u64);
        if total > 0 {
            self.used_area as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Places a `w`x`h` rectangle, returning its position, or `None` when no free
    /// rectangle can hold it. Degenerate sizes are never placed.
    pub fn insert(&mut self, w: i32, h: i32) -> Option<Rect> {
        if w <= 0 || h <= 0 {
            tracing::debug!(w, h, "rejecting degenerate insert");
            return None;
        }
        let chosen = self.find_position(w, h)?;
        let used = Rect::new(chosen.x, chosen.y, w, h);
        self.place_rect(&used.grow(self.padding, self.padding));
        self.used_area += used.area() as u64;
        self.allocations += 1;
        tracing::trace!(x = used.x, y = used.y, w, h, free = self.free.len(), "placed");
        Some(used)
    }

    // Best short side fit. Strict comparison keeps the earliest candidate on ties.
    fn find_position(&self, w: i32, h: i32) -> Option<Rect> {
        let mut best: Option<Rect> = None;
        let mut best_short = i32::MAX;
        for fr in &self.free {
            if fr.w < w || fr.h < h {
                continue;
            }
            let short_fit = (fr.w - w).min(fr.h - h);
            if short_fit < best_short {
                best_short = short_fit;
                best = Some(*fr);
            }
        }
        best
    }

    fn place_rect(&mut self, node: &Rect) {
        let mut kept: Vec<Rect> = Vec::with_capacity(self.free.len() + 4);
        let mut split: Vec<Rect> = Vec::new();
        for fr in self.free.drain(..) {
            if fr.intersects(node) {
                split.extend(split_free_node(&fr, node));
            } else {
                kept.push(fr);
            }
        }
        kept.extend(split);
        self.free = kept;
        self.prune_free_list();
    }

    // Drops every free rectangle contained in another; swap_remove, so order is not kept.
    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let a = self.free[i];
            let mut remove_i = false;
            let mut j = i + 1;
            while j < self.free.len() {
                let b = self.free[j];
                if b.contains(&a) {
                    remove_i = true;
                    break;
                }
                if a.contains(&b) {
                    self.free.swap_remove(j);
                    continue;
                }
                j += 1;
            }
            if remove_i {
                self.free.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}

/// Maximal remainders of `fr` around `node`: above/below when the horizontal spans
/// overlap, left/right when the vertical spans do. Corners are covered twice.
fn split_free_node(fr: &Rect, node: &Rect) -> ArrayVec<[Rect; 4]> {
    let mut out = ArrayVec::new();

    if node.x < fr.right() && node.right() > fr.x {
        // above
        if node.y > fr.y && node.y < fr.bottom() {
            out.push(Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
        }
        // below
        if node.bottom() < fr.bottom() {
            out.push(Rect::new(fr.x, node.bottom(), fr.w, fr.bottom() - node.bottom()));
        }
    }

    if node.y < fr.bottom() && node.bottom() > fr.y {
        // left
        if node.x > fr.x && node.x < fr.right() {
            out.push(Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
        }
        // right
        if node.right() < fr.right() {
            out.push(Rect::new(node.right(), fr.y, fr.right() - node.right(), fr.h));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_surrounds_centered_node() {
        let fr = Rect::new(0, 0, 100, 100);
        let node = Rect::new(40, 40, 20, 20);
        let parts = split_free_node(&fr, &node);
        assert_eq!(
            parts.as_slice(),
            &[
                Rect::new(0, 0, 100, 40),
                Rect::new(0, 60, 100, 40),
                Rect::new(0, 0, 40, 100),
                Rect::new(60, 0, 40, 100),
            ]
        );
    }

    #[test]
    fn split_top_left_node_leaves_two() {
        let fr = Rect::new(0, 0, 64, 32);
        let node = Rect::new(0, 0, 10, 10);
        let parts = split_free_node(&fr, &node);
        assert_eq!(
            parts.as_slice(),
            &[Rect::new(0, 10, 64, 22), Rect::new(10, 0, 54, 32)]
        );
    }

    #[test]
    fn exact_fit_consumes_page() {
        let mut a = RectangleAllocator::new((16, 16), 0);
        assert_eq!(a.insert(16, 16), Some(Rect::sized(16, 16)));
        assert!(a.free_rects().is_empty());
        assert_eq!(a.insert(1, 1), None);
    }

    #[test]
    fn clear_restores_full_page() {
        let mut a = RectangleAllocator::new((32, 32), 1);
        a.insert(10, 10).unwrap();
        a.clear();
        assert_eq!(a.free_rects(), &[Rect::sized(32, 32)]);
        assert_eq!(a.used_area(), 0);
        assert_eq!(a.allocation_count(), 0);
    }
}
