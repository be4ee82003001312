use egui::Color32;

use super::CommandResult;
use crate::document::Document;
use crate::error::{CommandError, DocumentError};
use crate::layer::{Layer, LayerId};
use crate::path::{Path, PathId};

/// Represents actions that can be undone/redone in the drawing application.
/// Layers are addressed by id so commands survive reordering.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Adds a path on top of a layer
    AddPath { layer: LayerId, path: Path },
    /// Removes a path; `index` is where it sat, for undo
    RemovePath { layer: LayerId, path: Path, index: usize },
    /// Swaps a path for an edited version with the same id
    ReplacePath { layer: LayerId, old: Path, new: Path },
    /// Empties a layer; `paths` is what it held
    ClearLayer { layer: LayerId, paths: Vec<Path> },
    AddLayer { layer: Layer, index: usize },
    DeleteLayer { layer: Layer, index: usize },
    RenameLayer { layer: LayerId, old_name: String, new_name: String },
    SetLayerOpacity { layer: LayerId, old: f32, new: f32 },
    SetLayerVisibility { layer: LayerId, old: bool, new: bool },
    SetLayerLocked { layer: LayerId, old: bool, new: bool },
    MoveLayer { from: usize, to: usize },
    SetBackground { old: Color32, new: Color32 },
    /// Several commands undone as one step (e.g. every copy of a symmetric stroke)
    Batch { label: String, commands: Vec<Command> },
}

impl Command {
    pub fn add_layer(doc: &Document, name: &str) -> Self {
        Command::AddLayer {
            layer: Layer::new(name),
            index: doc.layer_count(),
        }
    }

    pub fn duplicate_layer(doc: &Document, id: LayerId) -> Result<Self, DocumentError> {
        let index = doc.layer_index(id).ok_or(DocumentError::LayerNotFound(id))?;
        Ok(Command::AddLayer {
            layer: doc.layers()[index].duplicate(),
            index: index + 1,
        })
    }

    pub fn delete_layer(doc: &Document, id: LayerId) -> Result<Self, DocumentError> {
        if doc.layer_count() <= 1 {
            return Err(DocumentError::LastLayer);
        }
        let index = doc.layer_index(id).ok_or(DocumentError::LayerNotFound(id))?;
        Ok(Command::DeleteLayer {
            layer: doc.layers()[index].clone(),
            index,
        })
    }

    pub fn remove_path(doc: &Document, layer: LayerId, id: PathId) -> Result<Self, DocumentError> {
        let owner = doc.layer(layer)?;
        let index = owner
            .paths
            .iter()
            .position(|p| p.id == id)
            .ok_or(DocumentError::PathNotFound(id, layer))?;
        Ok(Command::RemovePath {
            layer,
            path: owner.paths[index].clone(),
            index,
        })
    }

    pub fn clear_layer(doc: &Document, layer: LayerId) -> Result<Self, DocumentError> {
        Ok(Command::ClearLayer {
            layer,
            paths: doc.layer(layer)?.paths.clone(),
        })
    }

    pub fn rename_layer(doc: &Document, layer: LayerId, new_name: &str) -> Result<Self, DocumentError> {
        Ok(Command::RenameLayer {
            layer,
            old_name: doc.layer(layer)?.name.clone(),
            new_name: new_name.to_string(),
        })
    }

    pub fn set_layer_opacity(doc: &Document, layer: LayerId, new: f32) -> Result<Self, DocumentError> {
        Ok(Command::SetLayerOpacity {
            layer,
            old: doc.layer(layer)?.opacity(),
            new,
        })
    }

    pub fn set_layer_visibility(doc: &Document, layer: LayerId, visible: bool) -> Result<Self, DocumentError> {
        Ok(Command::SetLayerVisibility {
            layer,
            old: doc.layer(layer)?.visible,
            new: visible,
        })
    }

    pub fn set_layer_locked(doc: &Document, layer: LayerId, locked: bool) -> Result<Self, DocumentError> {
        Ok(Command::SetLayerLocked {
            layer,
            old: doc.layer(layer)?.locked,
            new: locked,
        })
    }

    /// Wrap `commands` into one undo step; a single command stays as is.
    pub fn batch(label: impl Into<String>, mut commands: Vec<Command>) -> Result<Self, CommandError> {
        match commands.len() {
            0 => Err(CommandError::EmptyBatch),
            1 => Ok(commands.remove(0)),
            _ => Ok(Command::Batch {
                label: label.into(),
                commands,
            }),
        }
    }

    /// Short human readable description for the history list
    pub fn label(&self) -> String {
        match self {
            Command::AddPath { .. } => "Draw".to_owned(),
            Command::RemovePath { .. } => "Erase".to_owned(),
            Command::ReplacePath { .. } => "Fill".to_owned(),
            Command::ClearLayer { .. } => "Clear layer".to_owned(),
            Command::AddLayer { layer, .. } => format!("Add {}", layer.name),
            Command::DeleteLayer { layer, .. } => format!("Delete {}", layer.name),
            Command::RenameLayer { new_name, .. } => format!("Rename to {new_name}"),
            Command::SetLayerOpacity { .. } => "Layer opacity".to_owned(),
            Command::SetLayerVisibility { new: true, .. } => "Show layer".to_owned(),
            Command::SetLayerVisibility { new: false, .. } => "Hide layer".to_owned(),
            Command::SetLayerLocked { new: true, .. } => "Lock layer".to_owned(),
            Command::SetLayerLocked { new: false, .. } => "Unlock layer".to_owned(),
            Command::MoveLayer { .. } => "Reorder layers".to_owned(),
            Command::SetBackground { .. } => "Background".to_owned(),
            Command::Batch { label, .. } => label.clone(),
        }
    }

    pub fn execute(&self, doc: &mut Document) -> CommandResult {
        match self {
            Command::AddPath { layer, path } => doc.add_path(*layer, path.clone())?,
            Command::RemovePath { layer, path, .. } => {
                doc.remove_path(*layer, path.id)?;
            }
            Command::ReplacePath { layer, new, .. } => {
                doc.replace_path(*layer, new.clone())?;
            }
            Command::ClearLayer { layer, .. } => {
                doc.clear_layer(*layer)?;
            }
            Command::AddLayer { layer, index } => {
                doc.insert_layer(*index, layer.clone());
            }
            Command::DeleteLayer { layer, .. } => {
                doc.delete_layer(layer.id)?;
            }
            Command::RenameLayer { layer, new_name, .. } => {
                doc.rename_layer(*layer, new_name)?;
            }
            Command::SetLayerOpacity { layer, new, .. } => {
                doc.set_opacity(*layer, *new)?;
            }
            Command::SetLayerVisibility { layer, new, .. } => {
                doc.set_visibility(*layer, *new)?;
            }
            Command::SetLayerLocked { layer, new, .. } => {
                doc.set_locked(*layer, *new)?;
            }
            Command::MoveLayer { from, to } => doc.move_layer(*from, *to)?,
            Command::SetBackground { new, .. } => doc.background = *new,
            Command::Batch { commands, .. } => {
                for (done, command) in commands.iter().enumerate() {
                    if let Err(err) = command.execute(doc) {
                        // Roll back the part that went through; the execute error wins
                        let _ = undo_all(&commands[..done], doc);
                        return Err(err);
                    }
                }
            }
        }
        Ok(())
    }

    /// Reverse the effect of [`Self::execute`]. Undo bypasses the lock
    /// and visibility checks: history always wins over layer flags.
    pub fn undo(&self, doc: &mut Document) -> CommandResult {
        match self {
            Command::AddPath { layer, path } => {
                doc.layer_mut(*layer)?
                    .remove_path(path.id)
                    .ok_or(DocumentError::PathNotFound(path.id, *layer))?;
            }
            Command::RemovePath { layer, path, index } => {
                doc.layer_mut(*layer)?.insert_path(*index, path.clone());
            }
            Command::ReplacePath { layer, old, .. } => {
                let target = doc
                    .layer_mut(*layer)?
                    .path_mut(old.id)
                    .ok_or(DocumentError::PathNotFound(old.id, *layer))?;
                *target = old.clone();
            }
            Command::ClearLayer { layer, paths } => doc.restore_paths(*layer, paths.clone())?,
            Command::AddLayer { layer, .. } => {
                doc.delete_layer(layer.id)?;
            }
            Command::DeleteLayer { layer, index } => {
                doc.insert_layer(*index, layer.clone());
            }
            Command::RenameLayer { layer, old_name, .. } => {
                doc.rename_layer(*layer, old_name)?;
            }
            Command::SetLayerOpacity { layer, old, .. } => {
                doc.set_opacity(*layer, *old)?;
            }
            Command::SetLayerVisibility { layer, old, .. } => {
                doc.set_visibility(*layer, *old)?;
            }
            Command::SetLayerLocked { layer, old, .. } => {
                doc.set_locked(*layer, *old)?;
            }
            Command::MoveLayer { from, to } => doc.move_layer(*to, *from)?,
            Command::SetBackground { old, .. } => doc.background = *old,
            Command::Batch { commands, .. } => undo_all(commands, doc)?,
        }
        Ok(())
    }
}

/// Undo `commands` newest first. A failing step does not stop the rest;
/// the first error is returned once every step has been tried.
fn undo_all(commands: &[Command], doc: &mut Document) -> CommandResult {
    let mut first_error = None;
    for command in commands.iter().rev() {
        if let Err(err) = command.undo(doc) {
            log::warn!("undo of {} failed: {err}", command.label());
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}
