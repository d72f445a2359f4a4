//! Ordinary least squares over a single series or over paired coordinates.
//!
//! Degenerate inputs never produce `NaN`:
//! - fewer than two points fit to all zeros,
//! - identical X values fit a flat line through the mean of Y,
//! - identical Y values give `r_squared = 1.0` since the flat fit is exact.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt;

/// A point on a chart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Fitted values at the smallest and largest X, for drawing the trend line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regression_line: Option<[Point; 2]>,
}

impl RegressionResult {
    /// Value of the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn correlation(&self) -> CorrelationStrength {
        CorrelationStrength::from_r_squared(self.r_squared)
    }

    pub fn trend(&self) -> Trend {
        Trend::classify(self.r_squared, self.slope)
    }
}

/// Fit `ys` against their positions `0, 1, 2, …`.
pub fn simple_linear_regression(ys: &[f64]) -> RegressionResult {
    let points: Vec<Point> = ys
        .iter()
        .enumerate()
        .map(|(i, &y)| Point::new(i as f64, y))
        .collect();
    fit(&points)
}

/// Fit explicit `(x, y)` pairs and include the line's endpoints.
pub fn simple_linear_regression_xy(points: &[Point]) -> RegressionResult {
    let mut result = fit(points);
    if points.len() < 2 {
        return result;
    }

    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    result.regression_line = Some([
        Point::new(min_x, result.predict(min_x)),
        Point::new(max_x, result.predict(max_x)),
    ]);
    result
}

fn fit(points: &[Point]) -> RegressionResult {
    if points.len() < 2 {
        return RegressionResult::default();
    }

    let x_mean = points.iter().map(|p| p.x).mean();
    let y_mean = points.iter().map(|p| p.y).mean();

    let (numerator, denominator) = points.iter().fold((0.0, 0.0), |(num, den), p| {
        let x_diff = p.x - x_mean;
        (num + x_diff * (p.y - y_mean), den + x_diff * x_diff)
    });

    let slope = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };
    let intercept = y_mean - slope * x_mean;

    let (ss_total, ss_residual) = points.iter().fold((0.0, 0.0), |(tot, res), p| {
        let predicted = slope * p.x + intercept;
        (tot + (p.y - y_mean).powi(2), res + (p.y - predicted).powi(2))
    });

    let r_squared = if ss_total == 0.0 {
        1.0
    } else {
        1.0 - ss_residual / ss_total
    };

    RegressionResult {
        slope,
        intercept,
        r_squared,
        regression_line: None,
    }
}

/// How much of the variance a fit explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
    VeryWeak,
}

impl CorrelationStrength {
    pub fn from_r_squared(r_squared: f64) -> Self {
        if r_squared > 0.7 {
            Self::Strong
        } else if r_squared > 0.4 {
            Self::Moderate
        } else if r_squared > 0.2 {
            Self::Weak
        } else {
            Self::VeryWeak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "Strong correlation",
            Self::Moderate => "Moderate correlation",
            Self::Weak => "Weak correlation",
            Self::VeryWeak => "Very weak or no correlation",
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStrength {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Increase,
    Decrease,
}

/// Strength and direction of a time trend, e.g. "Moderate increase".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub strength: TrendStrength,
    pub direction: TrendDirection,
}

impl Trend {
    /// Only the 0.7 and 0.4 cutoffs apply here; everything else is weak.
    /// A flat slope counts as a decrease.
    pub fn classify(r_squared: f64, slope: f64) -> Self {
        let strength = if r_squared > 0.7 {
            TrendStrength::Strong
        } else if r_squared > 0.4 {
            TrendStrength::Moderate
        } else {
            TrendStrength::Weak
        };
        let direction = if slope > 0.0 {
            TrendDirection::Increase
        } else {
            TrendDirection::Decrease
        };
        Self {
            strength,
            direction,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strength = match self.strength {
            TrendStrength::Strong => "Strong",
            TrendStrength::Moderate => "Moderate",
            TrendStrength::Weak => "Weak",
        };
        let direction = match self.direction {
            TrendDirection::Increase => "increase",
            TrendDirection::Decrease => "decrease",
        };
        write!(f, "{} {}", strength, direction)
    }
}
