pub mod aggregation;
pub mod ranking;
pub mod regression;
pub mod stats;
pub mod trends;

#[cfg(test)]
mod tests;

pub use aggregation::{
    channel_kind_comparison, channel_totals, daily_views_by_channel, group_by, group_by_month,
    monthly_by_channel, shorts_comparison,
};
pub use regression::{
    simple_linear_regression, simple_linear_regression_xy, CorrelationStrength, Point,
    RegressionResult, Trend,
};
pub use stats::{median, min_max_normalize};
pub use trends::{monthly_trends, views_likes_correlation};
