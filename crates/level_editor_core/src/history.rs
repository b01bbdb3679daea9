// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history.
//!
//! [`HistoryStack`] keeps two sequences: `done` (most recent last) and
//! `undone` (most recent first). Recording clears `undone`; undo and redo each
//! move exactly one action between the two and replay it against a context
//! (for the editor, the [`Scene`](crate::entity::Scene)).

use crate::error::Result;
use std::collections::VecDeque;
use std::fmt;

/// Maximum undo history depth
pub const MAX_HISTORY: usize = 100;

/// A named, reversible unit of work
pub trait ReversibleAction<C> {
    /// Human-readable description
    fn label(&self) -> &str;

    /// Reverse the action
    fn undo(&self, ctx: &mut C) -> Result<()>;

    /// Re-apply the action
    fn redo(&self, ctx: &mut C) -> Result<()>;
}

type Step<C> = Box<dyn Fn(&mut C) -> Result<()>>;

/// Action built from an undo/redo closure pair
pub struct FnAction<C> {
    label: String,
    undo: Step<C>,
    redo: Step<C>,
}

impl<C> FnAction<C> {
    /// Create an action from its reverse and forward operations
    pub fn new(
        label: impl Into<String>,
        undo: impl Fn(&mut C) -> Result<()> + 'static,
        redo: impl Fn(&mut C) -> Result<()> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            undo: Box::new(undo),
            redo: Box::new(redo),
        }
    }
}

impl<C> ReversibleAction<C> for FnAction<C> {
    fn label(&self) -> &str {
        &self.label
    }

    fn undo(&self, ctx: &mut C) -> Result<()> {
        (self.undo)(ctx)
    }

    fn redo(&self, ctx: &mut C) -> Result<()> {
        (self.redo)(ctx)
    }
}

impl<C> fmt::Debug for FnAction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAction").field("label", &self.label).finish()
    }
}

/// History statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    /// Actions that can be undone
    pub undo_count: usize,
    /// Actions that can be redone
    pub redo_count: usize,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Undo/redo history manager
pub struct HistoryStack<C> {
    /// Most recent last
    done: VecDeque<Box<dyn ReversibleAction<C>>>,
    /// Most recent first
    undone: VecDeque<Box<dyn ReversibleAction<C>>>,
    max_depth: usize,
}

impl<C> HistoryStack<C> {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth (at least one entry is always kept)
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            done: VecDeque::new(),
            undone: VecDeque::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Append an action and discard everything that could be redone
    pub fn record(&mut self, action: impl ReversibleAction<C> + 'static) {
        self.record_boxed(Box::new(action));
    }

    /// [`HistoryStack::record`] for an already boxed action
    pub fn record_boxed(&mut self, action: Box<dyn ReversibleAction<C>>) {
        tracing::debug!("Recorded '{}'", action.label());
        self.undone.clear();
        self.done.push_back(action);

        while self.done.len() > self.max_depth {
            if let Some(dropped) = self.done.pop_front() {
                tracing::debug!("History full, dropped '{}'", dropped.label());
            }
        }
    }

    /// Undo the most recent action. Returns `Ok(false)` when there is nothing
    /// to undo. If the action fails to replay it stays on the undo side.
    pub fn undo(&mut self, ctx: &mut C) -> Result<bool> {
        let Some(action) = self.done.pop_back() else {
            return Ok(false);
        };

        if let Err(e) = action.undo(ctx) {
            tracing::warn!("Undo of '{}' failed: {e}", action.label());
            self.done.push_back(action);
            return Err(e);
        }

        tracing::debug!("Undo '{}'", action.label());
        self.undone.push_front(action);
        Ok(true)
    }

    /// Redo the most recently undone action. Returns `Ok(false)` when there is
    /// nothing to redo. If the action fails to replay it stays on the redo side.
    pub fn redo(&mut self, ctx: &mut C) -> Result<bool> {
        let Some(action) = self.undone.pop_front() else {
            return Ok(false);
        };

        if let Err(e) = action.redo(ctx) {
            tracing::warn!("Redo of '{}' failed: {e}", action.label());
            self.undone.push_front(action);
            return Err(e);
        }

        tracing::debug!("Redo '{}'", action.label());
        self.done.push_back(action);
        Ok(true)
    }

    /// Clear both sequences
    pub fn reset(&mut self) {
        self.done.clear();
        self.undone.clear();
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Get undo stack depth
    pub fn undo_depth(&self) -> usize {
        self.done.len()
    }

    /// Get redo stack depth
    pub fn redo_depth(&self) -> usize {
        self.undone.len()
    }

    /// Get description of next undo operation
    pub fn undo_label(&self) -> Option<&str> {
        self.done.back().map(|a| a.label())
    }

    /// Get description of next redo operation
    pub fn redo_label(&self) -> Option<&str> {
        self.undone.front().map(|a| a.label())
    }

    /// Labels of undoable actions, oldest first
    pub fn undo_labels(&self) -> impl Iterator<Item = &str> {
        self.done.iter().map(|a| a.label())
    }

    /// Labels of redoable actions, next redo first
    pub fn redo_labels(&self) -> impl Iterator<Item = &str> {
        self.undone.iter().map(|a| a.label())
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.done.len(),
            redo_count: self.undone.len(),
            max_depth: self.max_depth,
        }
    }
}

impl<C> Default for HistoryStack<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for HistoryStack<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStack")
            .field("done", &self.undo_labels().collect::<Vec<_>>())
            .field("undone", &self.redo_labels().collect::<Vec<_>>())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
