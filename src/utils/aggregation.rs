use crate::types::{ChannelSeries, DailySeries};

/// Merge neighbouring dates so a daily series has at most `target_points`
/// points. Each window is labelled with its first date and sums its views.
pub fn downsample_daily(series: &DailySeries, target_points: usize) -> DailySeries {
    if target_points == 0 || series.dates.len() <= target_points {
        return series.clone();
    }

    let window_size = (series.dates.len() as f64 / target_points as f64).ceil() as usize;

    let dates = series
        .dates
        .chunks(window_size)
        .map(|chunk| chunk[0].clone())
        .collect();
    let channels = series
        .channels
        .iter()
        .map(|channel| ChannelSeries {
            channel_title: channel.channel_title.clone(),
            values: channel
                .values
                .chunks(window_size)
                .map(|chunk| chunk.iter().sum())
                .collect(),
        })
        .collect();

    DailySeries { dates, channels }
}
