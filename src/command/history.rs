use std::collections::VecDeque;

use super::{Command, CommandResult};
use crate::document::Document;
use crate::error::CommandError;

pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Manages the history of executed commands for undo/redo functionality
#[derive(Debug)]
pub struct CommandHistory {
    /// Stack of commands that can be undone (back = most recent)
    undo_stack: VecDeque<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
    max_depth: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Execute a command and add it to the history if successful.
    /// A new command invalidates everything that could be redone.
    pub fn execute(&mut self, command: Command, doc: &mut Document) -> CommandResult {
        command.execute(doc)?;
        log::debug!("executed {}", command.label());

        self.undo_stack.push_back(command);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the last executed command
    pub fn undo(&mut self, doc: &mut Document) -> CommandResult {
        let command = self.undo_stack.pop_back().ok_or(CommandError::NothingToUndo)?;
        if let Err(err) = command.undo(doc) {
            log::warn!("undo of {} failed: {err}", command.label());
            self.undo_stack.push_back(command);
            return Err(err);
        }
        self.redo_stack.push(command);
        Ok(())
    }

    /// Redo the last undone command
    pub fn redo(&mut self, doc: &mut Document) -> CommandResult {
        let command = self.redo_stack.pop().ok_or(CommandError::NothingToRedo)?;
        if let Err(err) = command.execute(doc) {
            log::warn!("redo of {} failed: {err}", command.label());
            self.redo_stack.push(command);
            return Err(err);
        }
        self.undo_stack.push_back(command);
        Ok(())
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Labels of undoable commands, oldest first
    pub fn undo_labels(&self) -> Vec<String> {
        self.undo_stack.iter().map(Command::label).collect()
    }

    /// Labels of redoable commands, next-to-redo first
    pub fn redo_labels(&self) -> Vec<String> {
        self.redo_stack.iter().rev().map(Command::label).collect()
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
