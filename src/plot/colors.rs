// src/plot/colors.rs
//
// The "vibrant" categorical palette shared by every research chart.

pub const ORANGE: &str = "#EE7733";
pub const BLUE: &str = "#0077BB";
pub const TEAL: &str = "#009988";
pub const MAGENTA: &str = "#EE3377";
pub const GRAY: &str = "#BBBBBB";
pub const LIGHT_BLUE: &str = "#33BBEE";
