//! Bounded undo/redo stacks.

use std::collections::VecDeque;

/// Undo steps kept by an editing session.
pub const HISTORY_LIMIT: usize = 50;

/// Single-branch undo history: any new edit discards the redo stack.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    future: Vec<T>,
    limit: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(limit.min(HISTORY_LIMIT)),
            future: Vec::new(),
            limit,
        }
    }
}

impl<T: Clone> History<T> {
    /// Remember `previous` before a user edit replaces it.
    pub fn record(&mut self, previous: T) {
        self.past.push_back(previous);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Step back from `current`. `None` when there is nothing to undo.
    pub fn undo(&mut self, current: &T) -> Option<T> {
        let previous = self.past.pop_back()?;
        self.future.push(current.clone());
        Some(previous)
    }

    /// Step forward from `current`. `None` when there is nothing to redo.
    pub fn redo(&mut self, current: &T) -> Option<T> {
        let next = self.future.pop()?;
        self.past.push_back(current.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo and redo steps.
    pub fn depth(&self) -> (usize, usize) {
        (self.past.len(), self.future.len())
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
