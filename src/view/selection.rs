//! Selection Tracker
//!
//! Left-button drag selection in buffer coordinates. The anchor is where the
//! button went down; the published range is rebuilt on every move into a new
//! cell and only replaced when it actually differs.

use crate::core::{TextPosition, TextRange};

/// What a button release did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// A drag finished; copy this range
    Copy(TextRange),
    /// A click with no drag removed the selection
    Cleared,
    /// Nothing to do
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    anchor: Option<TextPosition>,
    selecting: bool,
    range: Option<TextRange>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Published selection
    pub fn range(&self) -> Option<TextRange> {
        self.range
    }

    /// A drag is in progress
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Primary button down at `position`
    pub fn press(&mut self, position: TextPosition) {
        self.anchor = Some(position);
        self.selecting = false;
    }

    /// Pointer moved to `position` with the primary button held
    ///
    /// Returns true when a new range was published.
    pub fn drag(&mut self, position: TextPosition) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };
        if anchor == position {
            return false;
        }
        self.selecting = true;
        let range = TextRange::new(anchor, position);
        if self.range == Some(range) {
            return false;
        }
        self.range = Some(range);
        true
    }

    /// Primary button up
    pub fn release(&mut self) -> ReleaseOutcome {
        self.anchor = None;
        if self.selecting {
            self.selecting = false;
            return match self.range {
                Some(range) => ReleaseOutcome::Copy(range),
                None => ReleaseOutcome::Unchanged,
            };
        }
        if self.range.take().is_some() {
            ReleaseOutcome::Cleared
        } else {
            ReleaseOutcome::Unchanged
        }
    }

    /// Drop the selection; true if there was one
    pub fn clear(&mut self) -> bool {
        self.anchor = None;
        self.selecting = false;
        self.range.take().is_some()
    }
}
