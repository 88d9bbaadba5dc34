// src/plot/mod.rs

pub mod colors;
pub mod configs;
pub mod spec;

pub use configs::{build, PlotFn, PLOTS};
pub use spec::{Axis, BarPoint, ColorScale, Margins, Mark, PlotSpec, PyramidPoint};
