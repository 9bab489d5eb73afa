use super::maxrects::RectangleAllocator;
use crate::config::PagerConfig;
use crate::error::{AtlasError, Result};
use crate::model::{AtlasEntry, Fragment, PagerStats, Placement, Rect};
use tracing::{debug, warn};

/// Ordered set of atlas pages that grows on demand.
///
/// Pages are never dropped while a pager lives. Oversized rectangles are cut into
/// tiles that each get a page of their own; those pages never become current.
#[derive(Debug, Clone)]
pub struct AtlasPager {
    page_size: (i32, i32),
    padding: i32,
    fragment_overlap: i32,
    pages: Vec<RectangleAllocator>,
    fragment_pages: Vec<bool>,
    current: usize,
}

impl AtlasPager {
    /// Creates a pager holding a single empty page. The config is validated first.
    pub fn new(cfg: &PagerConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            page_size: cfg.page_size(),
            padding: cfg.padding,
            fragment_overlap: cfg.fragment_overlap,
            pages: vec![RectangleAllocator::new(cfg.page_size(), cfg.padding)],
            fragment_pages: vec![false],
            current: 0,
        })
    }

    pub fn page_size(&self) -> (i32, i32) {
        self.page_size
    }
    pub fn padding(&self) -> i32 {
        self.padding
    }
    pub fn fragment_overlap(&self) -> i32 {
        self.fragment_overlap
    }
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
    pub fn current_page(&self) -> usize {
        self.current
    }
    pub fn page(&self, id: usize) -> Option<&RectangleAllocator> {
        self.pages.get(id)
    }
    pub fn pages(&self) -> &[RectangleAllocator] {
        &self.pages
    }
    /// True if page `id` was created to hold a single fragment.
    pub fn is_fragment_page(&self, id: usize) -> bool {
        self.fragment_pages.get(id).copied().unwrap_or(false)
    }

    /// Tries the current page only. A full page yields `None` and leaves the pager untouched.
    ///
    /// `rect` must have positive width and height; debug builds assert it, release
    /// builds answer `None`.
    pub fn allocate(&mut self, rect: Rect) -> Option<AtlasEntry> {
        debug_assert!(
            !rect.is_empty(),
            "zero-area allocation ({}x{})",
            rect.w,
            rect.h
        );
        let atlas_rect = self.pages[self.current].insert(rect.w, rect.h)?;
        Some(AtlasEntry {
            atlas_id: self.current,
            atlas_rect,
            source_rect: rect,
        })
    }

    /// Appends a fresh `page_size` page, makes it current and returns its index.
    pub fn create_atlas(&mut self) -> usize {
        let id = self.push_page(self.page_size, false);
        self.current = id;
        debug!(page = id, w = self.page_size.0, h = self.page_size.1, "created atlas page");
        id
    }

    fn push_page(&mut self, size: (i32, i32), fragment: bool) -> usize {
        self.pages.push(RectangleAllocator::new(size, self.padding));
        self.fragment_pages.push(fragment);
        self.pages.len() - 1
    }

    /// Splits `rect` into tiles stepping by `page_size - fragment_overlap`, placing each
    /// tile alone on a page sized to it. The current page is left as it was.
    pub fn allocate_fragmented(&mut self, rect: Rect, out: &mut Vec<Fragment>) {
        if rect.is_empty() {
            return;
        }
        let previous = self.current;
        let xs = tile_spans(rect.w, self.page_size.0, self.fragment_overlap);
        let ys = tile_spans(rect.h, self.page_size.1, self.fragment_overlap);
        debug!(
            w = rect.w,
            h = rect.h,
            columns = xs.len(),
            rows = ys.len(),
            "fragmenting oversized rectangle"
        );

        for &(oy, th) in &ys {
            for &(ox, tw) in &xs {
                let id = self.push_page((tw, th), true);
                self.current = id;
                let piece = Rect::new(rect.x + ox, rect.y + oy, tw, th);
                // A page sized to its only occupant always has room for it.
                match self.allocate(piece) {
                    Some(entry) => out.push(Fragment {
                        entry,
                        offset: (ox, oy),
                    }),
                    None => {
                        warn!(page = id, w = tw, h = th, "fragment did not fit its dedicated page");
                        debug_assert!(false, "fragment {tw}x{th} rejected by page {id}");
                    }
                }
            }
        }

        self.current = previous;
    }

    /// Places `rect` whole when it fits within `max_size` (clamped to the page size),
    /// opening one new page if the current one is full; otherwise fragments it.
    /// `callback` runs once per produced placement.
    pub fn allocate_atlas_rect<F>(
        &mut self,
        rect: Rect,
        max_size: (i32, i32),
        mut callback: F,
    ) -> Result<()>
    where
        F: FnMut(Placement),
    {
        if rect.is_empty() {
            return Err(AtlasError::EmptyRect {
                width: rect.w,
                height: rect.h,
            });
        }
        let max_w = max_size.0.min(self.page_size.0);
        let max_h = max_size.1.min(self.page_size.1);
        if max_w <= 0 || max_h <= 0 {
            return Err(AtlasError::InvalidConfig(format!(
                "max_size ({}x{}) must be positive",
                max_size.0, max_size.1
            )));
        }

        if rect.w > max_w || rect.h > max_h {
            let mut fragments = Vec::new();
            self.allocate_fragmented(rect, &mut fragments);
            for f in fragments {
                callback(Placement::Fragment(f));
            }
            return Ok(());
        }

        let entry = match self.allocate(rect) {
            Some(e) => e,
            None => {
                self.create_atlas();
                self.allocate(rect).ok_or(AtlasError::OutOfSpace)?
            }
        };
        callback(Placement::Whole(entry));
        Ok(())
    }

    /// Convenience over `allocate_atlas_rect` collecting placements into a `Vec`.
    pub fn allocate_collect(
        &mut self,
        rect: Rect,
        max_size: (i32, i32),
    ) -> Result<Vec<Placement>> {
        let mut out = Vec::new();
        self.allocate_atlas_rect(rect, max_size, |p| out.push(p))?;
        Ok(out)
    }

    /// Computes occupancy statistics over every page.
    pub fn stats(&self) -> PagerStats {
        let mut total_page_area = 0u64;
        let mut used_area = 0u64;
        let mut num_placements = 0;
        for p in &self.pages {
            let (w, h) = p.size();
            total_page_area += (w.max(0) as u64) * (h.max(0) as u64);
            used_area += p.used_area();
            num_placements += p.allocation_count();
        }
        let occupancy = if total_page_area > 0 {
            used_area as f64 / total_page_area as f64
        } else {
            0.0
        };
        PagerStats {
            num_pages: self.pages.len(),
            num_placements,
            num_fragment_pages: self.fragment_pages.iter().filter(|f| **f).count(),
            total_page_area,
            used_area,
            occupancy,
        }
    }
}

/// `(offset, length)` spans covering `0..total` with steps of `page - overlap`; the
/// last span is clamped and no span lies entirely inside its predecessor.
fn tile_spans(total: i32, page: i32, overlap: i32) -> Vec<(i32, i32)> {
    let step = (page - overlap).max(1);
    let mut spans = Vec::new();
    let mut offset = 0;
    loop {
        let len = page.min(total - offset);
        spans.push((offset, len));
        if offset + len >= total {
            break;
        }
        offset += step;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_fit_in_one_page() {
        assert_eq!(tile_spans(400, 2048, 2), vec![(0, 400)]);
        assert_eq!(tile_spans(2048, 2048, 2), vec![(0, 2048)]);
    }

    #[test]
    fn spans_overlap_by_configured_amount() {
        assert_eq!(tile_spans(3000, 2048, 2), vec![(0, 2048), (2046, 954)]);
        assert_eq!(
            tile_spans(300, 100, 10),
            vec![(0, 100), (90, 100), (180, 100), (270, 30)]
        );
    }

    #[test]
    fn no_span_hides_inside_previous() {
        // 2049 needs a second span; 2046 + 3 reaches the end.
        assert_eq!(tile_spans(2049, 2048, 2), vec![(0, 2048), (2046, 3)]);
    }
}
