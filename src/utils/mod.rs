pub mod aggregation;
pub mod colors;
pub mod format;

pub use aggregation::downsample_daily;
pub use colors::{assign_colors, assign_colors_with, ChannelColorMap};
pub use format::{format_duration, format_number};
