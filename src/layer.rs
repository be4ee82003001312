use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::path::{Path, PathId};

/// A unique identifier for a layer
pub type LayerId = Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    /// Unique identifier for the layer
    pub id: LayerId,
    /// Display name of the layer
    pub name: String,
    /// Whether the layer is currently visible
    pub visible: bool,
    /// Locked layers can't be drawn on or erased
    pub locked: bool,
    /// Opacity in `[0, 1]`
    opacity: f32,
    /// Paths, bottom to top
    pub paths: Vec<Path>,
}

impl Layer {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            visible: true,
            locked: false,
            opacity: 1.0,
            paths: Vec::new(),
        }
    }

    /// A deep copy with its own layer id and path ids.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("{} copy", self.name),
            visible: self.visible,
            locked: false,
            opacity: self.opacity,
            paths: self.paths.iter().map(Path::with_fresh_id).collect(),
        }
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    }

    /// Accepts new paths: visible and unlocked.
    pub fn is_editable(&self) -> bool {
        self.visible && !self.locked
    }

    pub fn add_path(&mut self, path: Path) {
        self.paths.push(path);
    }

    pub fn insert_path(&mut self, index: usize, path: Path) {
        let index = index.min(self.paths.len());
        self.paths.insert(index, path);
    }

    /// Removes a path by id, returning it with its former index.
    pub fn remove_path(&mut self, id: PathId) -> Option<(usize, Path)> {
        let index = self.paths.iter().position(|p| p.id == id)?;
        Some((index, self.paths.remove(index)))
    }

    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.iter().find(|p| p.id == id)
    }

    pub fn path_mut(&mut self, id: PathId) -> Option<&mut Path> {
        self.paths.iter_mut().find(|p| p.id == id)
    }

    /// Topmost path under `pos`
    pub fn hit_test(&self, pos: egui::Pos2, tolerance: f32) -> Option<&Path> {
        self.paths.iter().rev().find(|p| p.hit_test(pos, tolerance))
    }

    pub fn max_path_id(&self) -> PathId {
        self.paths.iter().map(|p| p.id).max().unwrap_or(0)
    }
}
