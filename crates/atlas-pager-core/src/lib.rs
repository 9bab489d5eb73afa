//! Core library for allocating rectangles across texture atlas pages.
//!
//! - Pages: MaxRects free list with best-short-side fit and deterministic tie-breaking
//! - Pager: overflow onto new pages, fragmentation of oversized rectangles with seam overlap
//! - Merge: folds overlapping source regions into shared units before packing
//! - Pipeline: `pack_layout` packs keyed regions in one call and reports per-item placements
//!
//! Quick example:
//! ```
//! use atlas_pager_core::prelude::*;
//! # fn main() -> atlas_pager_core::Result<()> {
//! let cfg = PagerConfig::builder().with_page_size(1024, 1024).build();
//! let mut pager = AtlasPager::new(&cfg)?;
//! pager.allocate_atlas_rect(Rect::sized(64, 32), cfg.effective_max_size(), |p| {
//!     println!("page {} at {:?}", p.entry().atlas_id, p.entry().atlas_rect);
//! })?;
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod merge;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use merge::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `atlas_pager_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PagerConfig, PagerConfigBuilder, SortOrder};
    pub use crate::error::AtlasError;
    pub use crate::merge::{merge_overlapping, sufficient_overlap};
    pub use crate::model::{AtlasEntry, Fragment, PagerStats, Placement, Rect};
    pub use crate::packer::{AtlasPager, RectangleAllocator};
    pub use crate::pipeline::{Layout, LayoutEntry, LayoutItem, PackedUnit, PageInfo};
    pub use crate::{pack_layout, pack_layouts, to_json, validate_source_rect};
}
