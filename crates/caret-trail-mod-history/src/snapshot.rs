/// Core value types for selection snapshots.
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A position in the document as line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// 0-indexed line number.
    pub line: usize,
    /// 0-indexed column (char offset within line).
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line.cmp(&other.line).then(self.col.cmp(&other.col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;

    /// Parses `line:col`.
    fn from_str(s: &str) -> Result<Self> {
        let (line, col) = s
            .trim()
            .split_once(':')
            .with_context(|| format!("expected `line:col`, got `{s}`"))?;
        let line = line
            .trim()
            .parse()
            .with_context(|| format!("invalid line in `{s}`"))?;
        let col = col
            .trim()
            .parse()
            .with_context(|| format!("invalid column in `{s}`"))?;
        Ok(Self { line, col })
    }
}

/// One selection: an anchor and an active (head) position.
///
/// The anchor stays put while the selection is extended; the head is where
/// the caret is drawn. An empty range (anchor == head) is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionRange {
    pub anchor: Position,
    pub head: Position,
}

impl SelectionRange {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// An empty range at `pos`.
    pub fn caret(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Returns the start (min) position of the range.
    pub fn start(&self) -> Position {
        std::cmp::min(self.anchor, self.head)
    }

    /// Returns the end (max) position of the range.
    pub fn end(&self) -> Position {
        std::cmp::max(self.anchor, self.head)
    }

    /// Returns true if this range is a caret (anchor == head).
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

impl fmt::Display for SelectionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "{}", self.head)
        } else {
            write!(f, "{}-{}", self.anchor, self.head)
        }
    }
}

impl FromStr for SelectionRange {
    type Err = anyhow::Error;

    /// Parses `line:col` (caret) or `anchor_line:anchor_col-head_line:head_col`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('-') {
            Some((anchor, head)) => Ok(Self::new(anchor.parse()?, head.parse()?)),
            None => Ok(Self::caret(s.parse()?)),
        }
    }
}

/// Immutable capture of every selection range on a surface at one instant.
///
/// Range order is significant: it follows the host's multi-cursor order and
/// the first range is the primary one. Two snapshots are equal only when
/// they hold the same ranges in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    ranges: Vec<SelectionRange>,
}

impl StateSnapshot {
    pub fn new(ranges: Vec<SelectionRange>) -> Self {
        Self { ranges }
    }

    /// Snapshot of a surface with no document attached.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot holding a single range.
    pub fn single(range: SelectionRange) -> Self {
        Self {
            ranges: vec![range],
        }
    }

    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    /// The primary range, if any.
    pub fn primary(&self) -> Option<&SelectionRange> {
        self.ranges.first()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl FromIterator<SelectionRange> for StateSnapshot {
    fn from_iter<I: IntoIterator<Item = SelectionRange>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for StateSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ranges.is_empty() {
            return write!(f, "<none>");
        }
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

impl FromStr for StateSnapshot {
    type Err = anyhow::Error;

    /// Parses a comma-separated list of ranges.
    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<SelectionRange>()
                    .with_context(|| format!("invalid selection `{part}`"))
            })
            .collect()
    }
}
