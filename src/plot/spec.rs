// src/plot/spec.rs
//
// Declarative chart configuration. The front-end renderer consumes these
// specs verbatim; nothing here draws anything. Number formats are carried
// as d3-format strings ("$,.0f", ".1%").

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PlotSpec {
    pub title: String,
    pub subtitle: String,
    pub caption: String,
    pub x: Axis,
    pub y: Axis,
    /// Facet axis for grouped breakdown charts (facet = survey period).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorScale>,
    pub margins: Margins,
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
}

impl Axis {
    pub fn labeled(label: &str) -> Axis {
        Axis {
            label: Some(label.to_string()),
            ..Axis::default()
        }
    }

    pub fn tick_format(mut self, format: &str) -> Axis {
        self.tick_format = Some(format.to_string());
        self
    }

    pub fn domain(mut self, domain: [f64; 2]) -> Axis {
        self.domain = Some(domain);
        self
    }
}

/// Ordered legend domain with its parallel color range.
#[derive(Debug, Clone, Serialize)]
pub struct ColorScale {
    pub legend: bool,
    pub domain: Vec<String>,
    pub range: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            top: 30,
            right: 0,
            bottom: 36,
            left: 40,
        }
    }
}

impl Margins {
    pub fn with_left(left: u32) -> Margins {
        Margins {
            left,
            ..Margins::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mark {
    /// Vertical bars with printed value labels and error whiskers where a
    /// margin is present.
    BarY {
        data: Vec<BarPoint>,
        label_format: String,
        /// Hex color, or the sentinel `"group"` to color by group.
        fill: String,
    },
    /// Horizontal reference line, usually at zero under grouped bars.
    RuleY { y: f64 },
    /// One side of a population pyramid; the renderer mirrors the male side.
    AreaX {
        data: Vec<PyramidPoint>,
        sex: String,
        fill: String,
        curve: String,
    },
    /// Placeholder rendered when a series has no observations.
    NoData,
}

/// One bar: `x` is the survey period for single-series charts or the group
/// label for faceted breakdowns (with the period in `facet`).
#[derive(Debug, Clone, Serialize)]
pub struct BarPoint {
    pub x: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PyramidPoint {
    pub age_start: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_end: Option<u8>,
    pub population: f64,
}
