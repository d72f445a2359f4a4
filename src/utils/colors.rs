//! Stable channel-to-color assignment.
//!
//! Colors are handed out in the order channels are first seen, cycling
//! through the palette once it runs out. The same channels in a different
//! order get different colors.

use serde::ser::{Serialize, Serializer};
use std::collections::HashMap;

/// Default six-color palette.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#D95B5B", "#778D8D", "#F58A5C", "#8FBC8F", "#6A8EAE", "#C1B5A1",
];

/// Ten-color palette for datasets with many channels.
pub const EXTENDED_PALETTE: [&str; 10] = [
    "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2", "#7F7F7F",
    "#BCBD22", "#17BECF",
];

/// Used for channels missing from a map and when the palette is empty.
pub const FALLBACK_COLOR: &str = "#3B82F6";

/// Immutable mapping from channel name to color token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelColorMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ChannelColorMap {
    pub fn get(&self, channel: &str) -> Option<&str> {
        self.index
            .get(channel)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Color for `channel`, or [`FALLBACK_COLOR`] if it was never assigned.
    pub fn color_or_default(&self, channel: &str) -> &str {
        self.get(channel).unwrap_or(FALLBACK_COLOR)
    }

    /// `(channel, color)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, k)| (c.as_str(), k.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ChannelColorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Assign colors from [`DEFAULT_PALETTE`].
pub fn assign_colors<S: AsRef<str>>(labels: &[S]) -> ChannelColorMap {
    assign_colors_with(labels, &DEFAULT_PALETTE)
}

/// Walk `labels` in order, giving each distinct label the next palette entry.
pub fn assign_colors_with<S: AsRef<str>, P: AsRef<str>>(labels: &[S], palette: &[P]) -> ChannelColorMap {
    let mut map = ChannelColorMap::default();

    for label in labels {
        let label = label.as_ref();
        if map.index.contains_key(label) {
            continue;
        }
        let position = map.entries.len();
        let color = if palette.is_empty() {
            FALLBACK_COLOR
        } else {
            palette[position % palette.len()].as_ref()
        };
        map.index.insert(label.to_string(), position);
        map.entries.push((label.to_string(), color.to_string()));
    }

    map
}
