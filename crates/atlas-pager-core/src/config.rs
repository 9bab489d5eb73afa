use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order in which packing units are fed to the pager.
/// Sorting is stable, so `None` keeps input order and equal keys keep their relative order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    AreaDesc,
    MaxSideDesc,
    HeightDesc,
    WidthDesc,
    None,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "area_desc" => Ok(Self::AreaDesc),
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "height_desc" => Ok(Self::HeightDesc),
            "width_desc" => Ok(Self::WidthDesc),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PagerConfig {
    /// Page width in pixels.
    pub page_width: i32,
    /// Page height in pixels.
    pub page_height: i32,
    /// Margin reserved right of and below every placement.
    pub padding: i32,
    /// Source pixels shared by neighbouring fragments of an oversized rectangle.
    pub fragment_overlap: i32,
    /// Largest rectangle placed whole; anything bigger is fragmented.
    /// Clamped to the page size. None means the page size.
    #[serde(default)]
    pub max_size: Option<(i32, i32)>,

    /// Merge sufficiently overlapping source regions before packing.
    #[serde(default)]
    pub merge_overlapping: bool,
    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
    /// Pack independent item sets on the rayon pool when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_width: 2048,
            page_height: 2048,
            padding: 1,
            fragment_overlap: 2,
            max_size: None,
            merge_overlapping: false,
            sort_order: default_sort_order(),
            parallel: false,
        }
    }
}

impl PagerConfig {
    pub fn page_size(&self) -> (i32, i32) {
        (self.page_width, self.page_height)
    }

    /// `max_size` clamped to the page size.
    pub fn effective_max_size(&self) -> (i32, i32) {
        let (mw, mh) = self.max_size.unwrap_or(self.page_size());
        (mw.min(self.page_width), mh.min(self.page_height))
    }

    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - Page dimensions are zero or negative
    /// - Padding is negative
    /// - Fragment overlap would keep fragmentation from advancing
    /// - `max_size` is not positive
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasError;

        if self.page_width <= 0 || self.page_height <= 0 {
            return Err(AtlasError::InvalidDimensions {
                width: self.page_width,
                height: self.page_height,
            });
        }

        if self.padding < 0 {
            return Err(AtlasError::InvalidConfig(format!(
                "padding ({}) must not be negative",
                self.padding
            )));
        }

        // Fragments step by page_size - overlap; a non-positive step never terminates.
        let min_side = self.page_width.min(self.page_height);
        if self.fragment_overlap < 0 || self.fragment_overlap >= min_side {
            return Err(AtlasError::InvalidConfig(format!(
                "fragment_overlap ({}) must be in 0..{} for a {}x{} page",
                self.fragment_overlap, min_side, self.page_width, self.page_height
            )));
        }

        if let Some((mw, mh)) = self.max_size {
            if mw <= 0 || mh <= 0 {
                return Err(AtlasError::InvalidConfig(format!(
                    "max_size ({}x{}) must be positive",
                    mw, mh
                )));
            }
        }

        Ok(())
    }
}

fn default_sort_order() -> SortOrder {
    SortOrder::AreaDesc
}

/// Builder for `PagerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PagerConfigBuilder {
    cfg: PagerConfig,
}

impl PagerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PagerConfig::default(),
        }
    }
    pub fn with_page_size(mut self, w: i32, h: i32) -> Self {
        self.cfg.page_width = w;
        self.cfg.page_height = h;
        self
    }
    pub fn padding(mut self, v: i32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn fragment_overlap(mut self, v: i32) -> Self {
        self.cfg.fragment_overlap = v;
        self
    }
    pub fn max_size(mut self, v: Option<(i32, i32)>) -> Self {
        self.cfg.max_size = v;
        self
    }
    pub fn merge_overlapping(mut self, v: bool) -> Self {
        self.cfg.merge_overlapping = v;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> PagerConfig {
        self.cfg
    }
}

impl PagerConfig {
    /// Create a fluent builder for `PagerConfig`.
    pub fn builder() -> PagerConfigBuilder {
        PagerConfigBuilder::new()
    }
}
