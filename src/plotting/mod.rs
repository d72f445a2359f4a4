//! PNG chart rendering for the dashboard views.

pub mod chart;
pub mod styles;

#[cfg(test)]
mod tests;

pub use chart::{
    calculate_adaptive_range, render_all, render_all_async, render_channel_totals,
    render_daily_views, render_monthly_trends, render_views_likes, ChartOptions,
};
pub use styles::{parse_hex_color, ChartStyle, ChartTheme};
