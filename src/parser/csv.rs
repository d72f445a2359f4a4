//! Delimited-text parsing for the video dataset.
//!
//! Data rows are never rejected. Every value that had to be coerced is
//! reported as a [`RowIssue`] next to the typed records so callers can decide
//! how loud to be about a dirty file.

use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::error::{DashboardError, Result};
use crate::types::{parse_published_at, VideoRecord};

/// Columns of the video CSV that map onto [`VideoRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvField {
    VideoId,
    VideoTitle,
    ChannelTitle,
    PublishedAt,
    Views,
    Likes,
    DurationSeconds,
    ThumbnailUrl,
}

impl CsvField {
    pub fn from_header(header: &str) -> Option<Self> {
        match header.trim() {
            "video_id" => Some(Self::VideoId),
            "video_title" => Some(Self::VideoTitle),
            "channel_title" => Some(Self::ChannelTitle),
            "published_at" => Some(Self::PublishedAt),
            "views" => Some(Self::Views),
            "likes" => Some(Self::Likes),
            "duration_seconds" => Some(Self::DurationSeconds),
            "thumbnail_url" => Some(Self::ThumbnailUrl),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::VideoId => "video_id",
            Self::VideoTitle => "video_title",
            Self::ChannelTitle => "channel_title",
            Self::PublishedAt => "published_at",
            Self::Views => "views",
            Self::Likes => "likes",
            Self::DurationSeconds => "duration_seconds",
            Self::ThumbnailUrl => "thumbnail_url",
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Self::Views | Self::Likes | Self::DurationSeconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Not a number. Trailing garbage is rejected as a whole: `"12abc"`
    /// stores `0` here rather than taking the leading `12`.
    InvalidNumber,
    NegativeNumber,
    InvalidDate,
    UnterminatedQuote,
    MissingField,
    DuplicateId,
}

/// A value that could not be taken as-is and was replaced by a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    /// 1-based line number in the source text
    pub line: usize,
    pub field: String,
    pub value: String,
    pub kind: IssueKind,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            IssueKind::InvalidNumber => "unparseable number, using 0",
            IssueKind::NegativeNumber => "negative number, using 0",
            IssueKind::InvalidDate => "invalid date, excluded from date-based views",
            IssueKind::UnterminatedQuote => "unterminated quote, split best-effort",
            IssueKind::MissingField => "missing value, using default",
            IssueKind::DuplicateId => "duplicate video id",
        };
        write!(f, "line {}: {} {:?}: {}", self.line, self.field, self.value, what)
    }
}

/// Records parsed from a CSV document together with every coercion applied.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedVideos {
    pub records: Vec<VideoRecord>,
    pub issues: Vec<RowIssue>,
}

/// Split one line into field values.
///
/// Commas inside double quotes do not separate fields and `""` inside a quoted
/// section is a literal quote. Whitespace outside quotes is trimmed. An
/// unterminated quote swallows the rest of the line into the current field.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    split_fields(line).0
}

/// Same as [`parse_csv_line`], also reporting whether all quotes were closed.
fn split_fields(line: &str) -> (Vec<String>, bool) {
    let mut fields = Vec::new();
    let mut current = String::new();
    // Bytes of `current` that came from inside quotes and must survive trimming.
    let mut protected = 0;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
                protected = current.len();
            }
            '"' => {
                in_quotes = !in_quotes;
                protected = current.len();
            }
            ',' if !in_quotes => {
                fields.push(finish_field(&mut current, protected));
                protected = 0;
            }
            c if !in_quotes && c.is_whitespace() && current.is_empty() => {}
            c => {
                current.push(c);
                if in_quotes {
                    protected = current.len();
                }
            }
        }
    }
    fields.push(finish_field(&mut current, protected));

    (fields, !in_quotes)
}

fn finish_field(current: &mut String, protected: usize) -> String {
    let keep = current.trim_end().len().max(protected);
    current.truncate(keep);
    std::mem::take(current)
}

/// Parse a whole CSV document: a header line followed by data lines.
///
/// Unknown headers are ignored, blank lines are skipped and numeric columns
/// default to `0`. Fails only when there is no header line at all.
pub fn parse_videos(content: &str) -> Result<ParsedVideos> {
    let mut lines = content.lines().enumerate();

    let header_line = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => return Err(DashboardError::EmptyInput("CSV has no header line".to_string())),
        }
    };

    let columns: Vec<Option<CsvField>> = parse_csv_line(header_line)
        .iter()
        .map(|h| CsvField::from_header(h))
        .collect();

    let mut parsed = ParsedVideos::default();
    let mut seen_ids = HashSet::new();

    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let record = parse_row(line, line_no, &columns, &mut parsed.issues);

        if !record.video_id.is_empty() && !seen_ids.insert(record.video_id.clone()) {
            parsed.issues.push(RowIssue {
                line: line_no,
                field: CsvField::VideoId.name().to_string(),
                value: record.video_id.clone(),
                kind: IssueKind::DuplicateId,
            });
        }
        parsed.records.push(record);
    }

    for issue in &parsed.issues {
        debug!("{}", issue);
    }
    if !parsed.issues.is_empty() {
        warn!(
            "Parsed {} videos with {} coerced values",
            parsed.records.len(),
            parsed.issues.len()
        );
    }

    Ok(parsed)
}

fn parse_row(
    line: &str,
    line_no: usize,
    columns: &[Option<CsvField>],
    issues: &mut Vec<RowIssue>,
) -> VideoRecord {
    let (values, balanced) = split_fields(line);
    if !balanced {
        issues.push(RowIssue {
            line: line_no,
            field: "*".to_string(),
            value: line.to_string(),
            kind: IssueKind::UnterminatedQuote,
        });
    }

    let mut video = VideoRecord::default();

    for (index, column) in columns.iter().enumerate() {
        let Some(field) = column else { continue };
        let Some(value) = values.get(index) else {
            issues.push(RowIssue {
                line: line_no,
                field: field.name().to_string(),
                value: String::new(),
                kind: IssueKind::MissingField,
            });
            continue;
        };

        if field.is_numeric() {
            let number = match coerce_count(value) {
                Ok(n) => n,
                Err(kind) => {
                    issues.push(RowIssue {
                        line: line_no,
                        field: field.name().to_string(),
                        value: value.clone(),
                        kind,
                    });
                    0
                }
            };
            match field {
                CsvField::Views => video.views = number,
                CsvField::Likes => video.likes = number,
                _ => video.duration_seconds = number,
            }
            continue;
        }

        let value = value.clone();
        match field {
            CsvField::VideoId => video.video_id = value,
            CsvField::VideoTitle => video.title = value,
            CsvField::ChannelTitle => video.channel_title = value,
            CsvField::PublishedAt => video.published_at = value,
            CsvField::ThumbnailUrl => {
                video.thumbnail_url = if value.is_empty() { None } else { Some(value) }
            }
            _ => {}
        }
    }

    if parse_published_at(&video.published_at).is_none() {
        issues.push(RowIssue {
            line: line_no,
            field: CsvField::PublishedAt.name().to_string(),
            value: video.published_at.clone(),
            kind: IssueKind::InvalidDate,
        });
    }

    video
}

/// Coerce a count column. Blank is a plain `0`; fractional values truncate.
pub(crate) fn coerce_count(raw: &str) -> std::result::Result<u64, IssueKind> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Ok(n);
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n.trunc() as u64),
        Ok(n) if n.is_finite() => Err(IssueKind::NegativeNumber),
        _ => Err(IssueKind::InvalidNumber),
    }
}
