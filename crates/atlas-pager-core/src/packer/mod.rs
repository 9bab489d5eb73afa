//! Page-level allocation: a single MaxRects page and the multi-page pager built on it.

pub mod maxrects;
pub mod pager;

pub use maxrects::RectangleAllocator;
pub use pager::AtlasPager;
