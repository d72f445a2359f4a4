//! Dashboard state: the loaded dataset, the active filter and the channel colors.

pub mod filter;
pub mod state;

pub use filter::VideoFilter;
pub use state::{Dashboard, DashboardReport};
