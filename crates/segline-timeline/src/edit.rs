//! Edit operations with undo/redo support.
//!
//! Every committed gesture becomes an `EditCommand` that knows how to apply
//! itself to a `TimelineModel` and produce its inverse for undo.

use segline_core::SegmentId;

use crate::model::TimelineModel;
use crate::trim::TrimRange;

// ── Edit commands ───────────────────────────────────────────────

/// A reversible edit to the timeline's order or trims.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Replace the timeline order.
    SetOrder {
        before: Vec<SegmentId>,
        after: Vec<SegmentId>,
    },
    /// Replace one segment's trim.
    SetTrim {
        segment_id: SegmentId,
        before: TrimRange,
        after: TrimRange,
    },
    /// A batch of commands applied in sequence.
    Batch(Vec<EditCommand>),
}

impl EditCommand {
    /// Apply this command to a model.
    pub fn apply(&self, model: &mut TimelineModel) {
        match self {
            Self::SetOrder { after, .. } => {
                model.set_order(after);
            }
            Self::SetTrim {
                segment_id, after, ..
            } => {
                model.set_trim(*segment_id, *after);
            }
            Self::Batch(commands) => {
                for cmd in commands {
                    cmd.apply(model);
                }
            }
        }
    }

    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match self {
            Self::SetOrder { before, after } => Self::SetOrder {
                before: after.clone(),
                after: before.clone(),
            },
            Self::SetTrim {
                segment_id,
                before,
                after,
            } => Self::SetTrim {
                segment_id: *segment_id,
                before: *after,
                after: *before,
            },
            Self::Batch(commands) => {
                Self::Batch(commands.iter().rev().map(|c| c.inverse()).collect())
            }
        }
    }

    /// Whether applying this command changes nothing.
    pub fn is_noop(&self) -> bool {
        match self {
            Self::SetOrder { before, after } => before == after,
            Self::SetTrim { before, after, .. } => before == after,
            Self::Batch(commands) => commands.iter().all(|c| c.is_noop()),
        }
    }
}

// ── Undo stack ──────────────────────────────────────────────────

/// Undo/redo history stack.
#[derive(Debug)]
pub struct UndoStack {
    /// Commands that have been executed (most recent last).
    undo: Vec<EditCommand>,
    /// Commands that have been undone (most recent last).
    redo: Vec<EditCommand>,
    /// Maximum history depth.
    max_depth: usize,
}

impl UndoStack {
    /// Create a new undo stack with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Push a command onto the undo stack after it has been executed.
    /// Clears the redo stack. No-op commands are not recorded.
    ///
    /// A trim that continues the previous trim of the same segment (its
    /// `before` is the last entry's `after`) is folded into that entry, so a
    /// run of nudges on one clip undoes in a single step.
    pub fn push(&mut self, command: EditCommand) {
        if command.is_noop() {
            return;
        }
        self.redo.clear();
        if let Some(last) = self.undo.last_mut() {
            if let Some(merged) = coalesce_trims(last, &command) {
                if merged.is_noop() {
                    self.undo.pop();
                } else {
                    *last = merged;
                }
                return;
            }
        }
        self.undo.push(command);
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    /// Pop the most recent command for undo. Returns the inverse command.
    pub fn undo(&mut self) -> Option<EditCommand> {
        let cmd = self.undo.pop()?;
        let inverse = cmd.inverse();
        self.redo.push(cmd);
        Some(inverse)
    }

    /// Pop the most recent undone command for redo. Returns the original command.
    pub fn redo(&mut self) -> Option<EditCommand> {
        let cmd = self.redo.pop()?;
        self.undo.push(cmd.clone());
        Some(cmd)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }
}

fn coalesce_trims(last: &EditCommand, next: &EditCommand) -> Option<EditCommand> {
    match (last, next) {
        (
            EditCommand::SetTrim {
                segment_id: a,
                before,
                after: joint,
            },
            EditCommand::SetTrim {
                segment_id: b,
                before: next_before,
                after,
            },
        ) if a == b && joint == next_before => Some(EditCommand::SetTrim {
            segment_id: *a,
            before: *before,
            after: *after,
        }),
        _ => None,
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}
