//! Settings that control how analysis results are produced.

use std::f64::consts::PI;

/// The config for pie charts and other analysis output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// The maximum number of labels fetched per pie chart, largest first.
    pub pie_detail_limit: u32,
    /// The smallest angle, in radians, a pie slice may have before it is
    /// merged into the "Other" slice.
    pub pie_tolerance_angle: f64,
}

impl AnalysisConfig {
    /// The fraction of the total below which a pie slice is merged into the
    /// "Other" slice.
    pub fn pie_threshold(&self) -> f64 {
        self.pie_tolerance_angle / (2.0 * PI)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pie_detail_limit: 30,
            pie_tolerance_angle: 0.075,
        }
    }
}
