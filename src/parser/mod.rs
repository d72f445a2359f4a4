pub mod csv;
pub mod geo;

pub use csv::{parse_csv_line, parse_videos, IssueKind, ParsedVideos, RowIssue};
pub use geo::{coerce_videos, filter_trending, parse_trending, TrendingCountry};
