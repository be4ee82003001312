use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::layer::{Layer, LayerId};
use crate::path::{Path, PathId};

pub const DEFAULT_CANVAS_SIZE: Vec2 = Vec2::new(1200.0, 800.0);

/// The drawing: an ordered stack of layers (index 0 is the bottom).
/// There is always at least one layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Document {
    layers: Vec<Layer>,
    active: LayerId,
    pub canvas_size: Vec2,
    pub background: Color32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE)
    }
}

impl Document {
    pub fn new(canvas_size: Vec2) -> Self {
        let layer = Layer::new("Layer 1");
        Self {
            active: layer.id,
            layers: vec![layer],
            canvas_size,
            background: Color32::from_rgb(0xfd, 0xfb, 0xf7),
        }
    }

    /// Restore the document invariants after deserializing.
    pub fn repair(&mut self) {
        if self.layers.is_empty() {
            let layer = Layer::new("Layer 1");
            self.active = layer.id;
            self.layers.push(layer);
        }
        for layer in &mut self.layers {
            // Stored opacity skips the setter's clamp
            layer.set_opacity(layer.opacity());
        }
        if self.layer_index(self.active).is_none() {
            self.active = self.layers[self.layers.len() - 1].id;
        }
        let max_id = self.layers.iter().map(Layer::max_path_id).max().unwrap_or(0);
        crate::id_generator::reserve_up_to(max_id);
    }

    pub fn canvas_rect(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.canvas_size)
    }

    pub fn center(&self) -> Pos2 {
        self.canvas_rect().center()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn layer(&self, id: LayerId) -> Result<&Layer, DocumentError> {
        self.layers
            .iter()
            .find(|l| l.id == id)
            .ok_or(DocumentError::LayerNotFound(id))
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer, DocumentError> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(DocumentError::LayerNotFound(id))
    }

    pub fn active_layer_id(&self) -> LayerId {
        self.active
    }

    pub fn active_layer(&self) -> &Layer {
        // `active` always names an existing layer
        self.layers
            .iter()
            .find(|l| l.id == self.active)
            .unwrap_or(&self.layers[self.layers.len() - 1])
    }

    pub fn set_active(&mut self, id: LayerId) -> Result<(), DocumentError> {
        self.layer(id)?;
        self.active = id;
        Ok(())
    }

    /// Name for the next new layer, e.g. "Layer 3".
    pub fn next_layer_name(&self) -> String {
        let mut n = self.layers.len() + 1;
        while self.layers.iter().any(|l| l.name == format!("Layer {n}")) {
            n += 1;
        }
        format!("Layer {n}")
    }

    /// Insert `layer` at `index` (clamped) and make it active.
    pub fn insert_layer(&mut self, index: usize, layer: Layer) -> LayerId {
        let index = index.min(self.layers.len());
        let id = layer.id;
        self.layers.insert(index, layer);
        self.active = id;
        id
    }

    /// Add a new empty layer on top of the stack.
    pub fn add_layer(&mut self, name: &str) -> LayerId {
        self.insert_layer(self.layers.len(), Layer::new(name))
    }

    /// Copy a layer and place the copy directly above it.
    pub fn duplicate_layer(&mut self, id: LayerId) -> Result<LayerId, DocumentError> {
        let index = self.layer_index(id).ok_or(DocumentError::LayerNotFound(id))?;
        let copy = self.layers[index].duplicate();
        Ok(self.insert_layer(index + 1, copy))
    }

    /// Remove a layer, refusing to remove the last one.
    pub fn delete_layer(&mut self, id: LayerId) -> Result<(usize, Layer), DocumentError> {
        if self.layers.len() <= 1 {
            return Err(DocumentError::LastLayer);
        }
        let index = self.layer_index(id).ok_or(DocumentError::LayerNotFound(id))?;
        let layer = self.layers.remove(index);
        if self.active == id {
            self.active = self.layers[index.saturating_sub(1).min(self.layers.len() - 1)].id;
        }
        Ok((index, layer))
    }

    pub fn rename_layer(&mut self, id: LayerId, name: &str) -> Result<String, DocumentError> {
        let layer = self.layer_mut(id)?;
        Ok(std::mem::replace(&mut layer.name, name.to_string()))
    }

    pub fn set_visibility(&mut self, id: LayerId, visible: bool) -> Result<bool, DocumentError> {
        let layer = self.layer_mut(id)?;
        Ok(std::mem::replace(&mut layer.visible, visible))
    }

    pub fn set_locked(&mut self, id: LayerId, locked: bool) -> Result<bool, DocumentError> {
        let layer = self.layer_mut(id)?;
        Ok(std::mem::replace(&mut layer.locked, locked))
    }

    pub fn set_opacity(&mut self, id: LayerId, opacity: f32) -> Result<f32, DocumentError> {
        let layer = self.layer_mut(id)?;
        let old = layer.opacity();
        layer.set_opacity(opacity);
        Ok(old)
    }

    /// Move the layer at `from` to position `to`.
    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<(), DocumentError> {
        let len = self.layers.len();
        for index in [from, to] {
            if index >= len {
                return Err(DocumentError::IndexOutOfRange { index, len });
            }
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        Ok(())
    }

    fn editable_layer_mut(&mut self, id: LayerId) -> Result<&mut Layer, DocumentError> {
        let layer = self.layer_mut(id)?;
        if layer.locked {
            return Err(DocumentError::LayerLocked(layer.name.clone()));
        }
        if !layer.visible {
            return Err(DocumentError::LayerHidden(layer.name.clone()));
        }
        Ok(layer)
    }

    pub fn add_path(&mut self, layer: LayerId, path: Path) -> Result<(), DocumentError> {
        self.editable_layer_mut(layer)?.add_path(path);
        Ok(())
    }

    pub fn insert_path(&mut self, layer: LayerId, index: usize, path: Path) -> Result<(), DocumentError> {
        self.editable_layer_mut(layer)?.insert_path(index, path);
        Ok(())
    }

    pub fn remove_path(&mut self, layer: LayerId, path: PathId) -> Result<(usize, Path), DocumentError> {
        self.editable_layer_mut(layer)?
            .remove_path(path)
            .ok_or(DocumentError::PathNotFound(path, layer))
    }

    /// Swap a path for `replacement` (same slot), returning the old one.
    pub fn replace_path(&mut self, layer: LayerId, replacement: Path) -> Result<Path, DocumentError> {
        let id = replacement.id;
        let target = self
            .editable_layer_mut(layer)?
            .path_mut(id)
            .ok_or(DocumentError::PathNotFound(id, layer))?;
        Ok(std::mem::replace(target, replacement))
    }

    /// Empty a layer, returning what it held.
    pub fn clear_layer(&mut self, layer: LayerId) -> Result<Vec<Path>, DocumentError> {
        Ok(std::mem::take(&mut self.editable_layer_mut(layer)?.paths))
    }

    /// Put back paths taken by [`Self::clear_layer`].
    pub fn restore_paths(&mut self, layer: LayerId, paths: Vec<Path>) -> Result<(), DocumentError> {
        self.layer_mut(layer)?.paths = paths;
        Ok(())
    }

    /// Topmost visible path under `pos`, searching layers top-down.
    pub fn hit_test(&self, pos: Pos2, tolerance: f32) -> Option<(LayerId, &Path)> {
        self.layers
            .iter()
            .rev()
            .filter(|l| l.visible)
            .find_map(|l| l.hit_test(pos, tolerance).map(|p| (l.id, p)))
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|l| l.paths.is_empty())
    }

    pub fn path_count(&self) -> usize {
        self.layers.iter().map(|l| l.paths.len()).sum()
    }
}
