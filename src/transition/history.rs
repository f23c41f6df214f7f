//! Logical history stack used to classify navigation direction.

use crate::model::{NavigationAction, RouteKey};

/// Slide direction of a navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Destination is deeper in history than the source.
    Forward,
    /// Destination is shallower in history than the source.
    Backward,
    /// Same-depth replace (query-only change, `Replace`, same route).
    #[default]
    None,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::None => "none",
        };
        f.write_str(name)
    }
}

/// Browser-like history: entries plus a cursor on the current one.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<RouteKey>,
    cursor: usize,
}

impl HistoryStack {
    pub fn new(initial: RouteKey) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// Current entry.
    pub fn current(&self) -> &RouteKey {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply a navigation to `to` and classify its direction.
    ///
    /// Deterministic for a given stack and (action, destination):
    /// - `Replace` rewrites the current entry.
    /// - `Push` drops forward entries and appends.
    /// - `Pop` moves to the nearest matching entry below the cursor, or to
    ///   the entry directly above it; any other destination is pushed.
    ///
    /// A destination with the same pathname as the source is always `None`.
    pub fn navigate(&mut self, to: &RouteKey, action: NavigationAction) -> Direction {
        let from = self.cursor;
        let same_pathname = self.current().same_pathname(to);

        match action {
            NavigationAction::Replace => {
                self.entries[self.cursor] = to.clone();
            }
            NavigationAction::Push => self.push(to),
            NavigationAction::Pop => {
                if let Some(idx) = self.find_pop_target(to) {
                    self.cursor = idx;
                } else {
                    self.push(to);
                }
            }
        }

        if same_pathname || self.cursor == from {
            Direction::None
        } else if self.cursor > from {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    fn push(&mut self, to: &RouteKey) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(to.clone());
        self.cursor += 1;
    }

    fn find_pop_target(&self, to: &RouteKey) -> Option<usize> {
        let cursor = self.cursor;
        if let Some(idx) = self.entries[..cursor].iter().rposition(|k| k == to) {
            return Some(idx);
        }
        (self.entries.get(cursor + 1) == Some(to)).then_some(cursor + 1)
    }
}
