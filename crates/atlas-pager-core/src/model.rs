use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size anchored at the origin.
    pub fn sized(w: i32, h: i32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }
    pub fn top(&self) -> i32 {
        self.y
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> i32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn size(&self) -> (i32, i32) {
        (self.w, self.h)
    }

    pub fn area(&self) -> i64 {
        (self.w as i64) * (self.h as i64)
    }

    /// True if either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Far edges `(x + w, y + h)`, or `None` when either one overflows `i32`.
    pub fn checked_far_edges(&self) -> Option<(i32, i32)> {
        Some((self.x.checked_add(self.w)?, self.y.checked_add(self.h)?))
    }

    /// True if the interiors overlap. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns true if `r` is fully inside `self` (edges may coincide).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }

    /// Minimal rectangle enclosing both `self` and `other`.
    pub fn combine(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let r = self.right().max(other.right());
        let b = self.bottom().max(other.bottom());
        Rect::new(x, y, r - x, b - y)
    }

    /// Grows width and height; the origin stays put.
    pub fn grow(&self, dw: i32, dh: i32) -> Rect {
        Rect::new(self.x, self.y, self.w + dw, self.h + dh)
    }
}

/// One placement produced by the pager.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasEntry {
    /// Index of the page holding the placement.
    pub atlas_id: usize,
    /// Where the rectangle landed inside that page.
    pub atlas_rect: Rect,
    /// Region of the source image this placement serves.
    pub source_rect: Rect,
}

/// A piece of an oversized rectangle that was split across pages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fragment {
    pub entry: AtlasEntry,
    /// Position of this piece within the original rectangle.
    pub offset: (i32, i32),
}

/// What the generic allocation entry point reports per produced record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    Whole(AtlasEntry),
    Fragment(Fragment),
}

impl Placement {
    pub fn entry(&self) -> &AtlasEntry {
        match self {
            Placement::Whole(e) => e,
            Placement::Fragment(f) => &f.entry,
        }
    }

    /// Offset within the requested rectangle; `(0, 0)` for whole placements.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Placement::Whole(_) => (0, 0),
            Placement::Fragment(f) => f.offset,
        }
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self, Placement::Fragment(_))
    }
}

/// Statistics about pager occupancy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PagerStats {
    /// Total number of pages, fragment pages included.
    pub num_pages: usize,
    /// Number of rectangles placed across all pages.
    pub num_placements: usize,
    /// Pages created to hold a single fragment.
    pub num_fragment_pages: usize,
    /// Sum of page areas.
    pub total_page_area: u64,
    /// Sum of placed (unpadded) rectangle areas.
    pub used_area: u64,
    /// used_area / total_page_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl PagerStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {} ({} fragment), Placements: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px²",
            self.num_pages,
            self.num_fragment_pages,
            self.num_placements,
            self.occupancy * 100.0,
            self.total_page_area,
            self.used_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_page_area.saturating_sub(self.used_area)
    }
}
