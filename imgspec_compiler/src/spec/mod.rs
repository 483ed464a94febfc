//! Compiled image verification directive
//!
//! [`ImageCheckSpec`] is what the clause compiler hands to the comparison
//! engine: which baseline images to load, how strict the comparison is, and
//! the three filter chains applied to the baseline, the sample and the
//! difference map.

pub mod error_rate;

pub use error_rate::{ErrorRate, ErrorRateError, ErrorRateUnit};

use serde::{Deserialize, Serialize};
use std::fmt;

/// One image transform with its integer parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "filter", content = "value", rename_all = "lowercase")]
pub enum FilterOp {
    Contrast(i32),
    Blur(i32),
    Denoise(i32),
    Saturation(i32),
    Quantinize(i32),
}

impl FilterOp {
    /// Name as written in clause text
    pub fn name(&self) -> &'static str {
        match self {
            FilterOp::Contrast(_) => "contrast",
            FilterOp::Blur(_) => "blur",
            FilterOp::Denoise(_) => "denoise",
            FilterOp::Saturation(_) => "saturation",
            FilterOp::Quantinize(_) => "quantinize",
        }
    }

    pub fn value(&self) -> i32 {
        match *self {
            FilterOp::Contrast(v)
            | FilterOp::Blur(v)
            | FilterOp::Denoise(v)
            | FilterOp::Saturation(v)
            | FilterOp::Quantinize(v) => v,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.value())
    }
}

/// Positional rectangle; sign and bounds are the comparison engine's concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl From<[i32; 4]> for Rect {
    fn from([x, y, width, height]: [i32; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// Which image a filter chain is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterChain {
    /// The baseline image loaded from `image_paths`
    Original,
    /// The screenshot under test
    Sample,
    /// The difference map derived from both
    Map,
}

impl FilterChain {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterChain::Original => "original",
            FilterChain::Sample => "sample",
            FilterChain::Map => "map",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCheckSpec {
    pub image_paths: Vec<String>,
    pub error_rate: ErrorRate,
    pub tolerance: u32,
    pub analyze_offset: Option<u32>,
    pub stretch: bool,
    pub crop_if_outside: bool,
    pub selected_area: Option<Rect>,
    pub original_filters: Vec<FilterOp>,
    pub sample_filters: Vec<FilterOp>,
    pub map_filters: Vec<FilterOp>,
}

impl ImageCheckSpec {
    pub fn filters(&self, chain: FilterChain) -> &[FilterOp] {
        match chain {
            FilterChain::Original => &self.original_filters,
            FilterChain::Sample => &self.sample_filters,
            FilterChain::Map => &self.map_filters,
        }
    }

    pub fn total_filters(&self) -> usize {
        self.original_filters.len() + self.sample_filters.len() + self.map_filters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_op_accessors() {
        let op = FilterOp::Quantinize(4);
        assert_eq!(op.name(), "quantinize");
        assert_eq!(op.value(), 4);
        assert_eq!(op.to_string(), "quantinize 4");
    }

    #[test]
    fn test_filter_op_json_shape() {
        let json = serde_json::to_value(FilterOp::Blur(-3)).unwrap();
        assert_eq!(json, serde_json::json!({"filter": "blur", "value": -3}));
    }

    #[test]
    fn test_rect_from_array() {
        let rect = Rect::from([10, 20, 100, 50]);
        assert_eq!(rect, Rect::new(10, 20, 100, 50));
        assert_eq!(rect.to_string(), "10 20 100 50");
    }
}
