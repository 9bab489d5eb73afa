use crate::model::{Placement, Rect};
use crate::pipeline::Layout;
use serde_json::{Value, json};

fn rect_json(r: &Rect) -> Value {
    json!({"x": r.x, "y": r.y, "w": r.w, "h": r.h})
}

fn placement_json(p: &Placement) -> Value {
    let e = p.entry();
    let (ox, oy) = p.offset();
    json!({
        "page": e.atlas_id,
        "frame": rect_json(&e.atlas_rect),
        "source": rect_json(&e.source_rect),
        "fragment": p.is_fragment(),
        "offset": {"x": ox, "y": oy}
    })
}

/// Serialize a `Layout` as `{ pages, units, entries, stats }` for in-process consumers
/// (texture upload, UV mapping). Keys are rendered with `ToString`.
pub fn to_json<K: ToString>(layout: &Layout<K>) -> Value {
    let pages: Vec<Value> = layout
        .pages
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "width": p.width,
                "height": p.height,
                "fragment": p.fragment,
                "placements": p.placements
            })
        })
        .collect();
    let units: Vec<Value> = layout
        .units
        .iter()
        .map(|u| {
            json!({
                "rect": rect_json(&u.rect),
                "placements": u.placements.iter().map(placement_json).collect::<Vec<_>>()
            })
        })
        .collect();
    let entries: Vec<Value> = layout
        .entries
        .iter()
        .map(|e| {
            let (ox, oy) = layout.offset_in_unit(e).unwrap_or((0, 0));
            json!({
                "key": e.key.to_string(),
                "source": rect_json(&e.source),
                "unit": e.unit,
                "unitOffset": {"x": ox, "y": oy}
            })
        })
        .collect();
    let s = &layout.stats;
    json!({
        "pages": pages,
        "units": units,
        "entries": entries,
        "stats": {
            "pages": s.num_pages,
            "fragmentPages": s.num_fragment_pages,
            "placements": s.num_placements,
            "usedArea": s.used_area,
            "totalArea": s.total_page_area,
            "occupancy": s.occupancy
        }
    })
}

/// Pretty-printed form of [`to_json`].
pub fn to_json_string<K: ToString>(layout: &Layout<K>) -> crate::error::Result<String> {
    Ok(serde_json::to_string_pretty(&to_json(layout))?)
}
