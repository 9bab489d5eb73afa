use crate::config::{PagerConfig, SortOrder};
use crate::error::{AtlasError, Result};
use crate::merge::merge_overlapping;
use crate::model::{PagerStats, Placement, Rect};
use crate::packer::AtlasPager;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A source region to pack, tagged with a caller key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutItem<K = String> {
    pub key: K,
    /// Region of the source image (its size is what gets packed).
    pub rect: Rect,
}

/// Page record of a finished layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub id: usize,
    pub width: i32,
    pub height: i32,
    /// Created to hold one fragment of an oversized unit.
    pub fragment: bool,
    pub placements: usize,
}

/// A packed rectangle and the placement(s) serving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackedUnit {
    pub rect: Rect,
    pub placements: Vec<Placement>,
}

/// Maps an input item onto the unit that holds its pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutEntry<K = String> {
    pub key: K,
    pub source: Rect,
    /// Index into `Layout::units`.
    pub unit: usize,
}

/// Result of a batch packing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout<K = String> {
    pub pages: Vec<PageInfo>,
    /// Units in packing order.
    pub units: Vec<PackedUnit>,
    /// One entry per input item, in input order.
    pub entries: Vec<LayoutEntry<K>>,
    pub stats: PagerStats,
}

impl<K> Layout<K> {
    /// Unit holding the pixels of `entry`.
    pub fn unit_of(&self, entry: &LayoutEntry<K>) -> Option<&PackedUnit> {
        self.units.get(entry.unit)
    }

    /// Offset of `entry`'s source region inside its unit.
    pub fn offset_in_unit(&self, entry: &LayoutEntry<K>) -> Option<(i32, i32)> {
        self.unit_of(entry)
            .map(|u| (entry.source.x - u.rect.x, entry.source.y - u.rect.y))
    }
}

#[instrument(skip_all)]
/// Packs `items` with a single pager and returns pages, units and per-item entries.
///
/// Notes:
/// - Sorting is stable, so equal keys keep input order and results are deterministic.
/// - With `merge_overlapping`, overlapping regions share one unit; each item maps to
///   the first unit containing it.
/// - Units larger than `max_size` (clamped to the page size) are fragmented.
pub fn pack_layout<K: Clone>(items: Vec<LayoutItem<K>>, cfg: &PagerConfig) -> Result<Layout<K>> {
    cfg.validate()?;

    if items.is_empty() {
        return Err(AtlasError::Empty);
    }
    for it in &items {
        validate_source_rect(&it.rect)?;
    }

    let mut rects: Vec<Rect> = items.iter().map(|it| it.rect).collect();
    if cfg.merge_overlapping {
        let before = rects.len();
        merge_overlapping(&mut rects);
        debug!(before, after = rects.len(), "merged overlapping regions");
    }

    let order = sorted_order(&rects, cfg.sort_order);
    let mut units: Vec<Rect> = order.iter().map(|&i| rects[i]).collect();

    let mut entries = Vec::with_capacity(items.len());
    if cfg.merge_overlapping {
        for it in items {
            let unit = match units.iter().position(|u| u.contains(&it.rect)) {
                Some(u) => u,
                None => {
                    units.push(it.rect);
                    units.len() - 1
                }
            };
            entries.push(LayoutEntry {
                key: it.key,
                source: it.rect,
                unit,
            });
        }
    } else {
        let mut unit_of = vec![0usize; items.len()];
        for (pos, &i) in order.iter().enumerate() {
            unit_of[i] = pos;
        }
        for (it, unit) in items.into_iter().zip(unit_of) {
            entries.push(LayoutEntry {
                key: it.key,
                source: it.rect,
                unit,
            });
        }
    }

    let mut pager = AtlasPager::new(cfg)?;
    let max_size = cfg.effective_max_size();
    let mut packed = Vec::with_capacity(units.len());
    for rect in units {
        let placements = pager.allocate_collect(rect, max_size)?;
        packed.push(PackedUnit { rect, placements });
    }

    let pages = pager
        .pages()
        .iter()
        .enumerate()
        .map(|(id, p)| PageInfo {
            id,
            width: p.size().0,
            height: p.size().1,
            fragment: pager.is_fragment_page(id),
            placements: p.allocation_count(),
        })
        .collect();
    let stats = pager.stats();
    debug!(pages = stats.num_pages, occupancy = stats.occupancy, "layout packed");

    Ok(Layout {
        pages,
        units: packed,
        entries,
        stats,
    })
}

/// Checks that `rect` can be packed and merged: positive size, non-negative origin
/// and far edges representable as `i32`.
pub fn validate_source_rect(rect: &Rect) -> Result<()> {
    if rect.is_empty() {
        return Err(AtlasError::EmptyRect {
            width: rect.w,
            height: rect.h,
        });
    }
    if rect.x < 0 || rect.y < 0 || rect.checked_far_edges().is_none() {
        return Err(AtlasError::InvalidRect {
            x: rect.x,
            y: rect.y,
            width: rect.w,
            height: rect.h,
        });
    }
    Ok(())
}

/// Packs independent item sets, each with its own pager.
/// With the "parallel" feature and `cfg.parallel`, sets are packed on the rayon pool.
pub fn pack_layouts<K: Clone + Send>(
    sets: Vec<Vec<LayoutItem<K>>>,
    cfg: &PagerConfig,
) -> Result<Vec<Layout<K>>> {
    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            return sets
                .into_par_iter()
                .map(|items| pack_layout(items, cfg))
                .collect();
        }
    }
    sets.into_iter().map(|items| pack_layout(items, cfg)).collect()
}

fn sorted_order(rects: &[Rect], order: SortOrder) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..rects.len()).collect();
    match order {
        SortOrder::None => {}
        SortOrder::AreaDesc => idx.sort_by(|&a, &b| rects[b].area().cmp(&rects[a].area())),
        SortOrder::MaxSideDesc => idx.sort_by(|&a, &b| {
            rects[b]
                .w
                .max(rects[b].h)
                .cmp(&rects[a].w.max(rects[a].h))
        }),
        SortOrder::HeightDesc => idx.sort_by(|&a, &b| rects[b].h.cmp(&rects[a].h)),
        SortOrder::WidthDesc => idx.sort_by(|&a, &b| rects[b].w.cmp(&rects[a].w)),
    }
    idx
}
