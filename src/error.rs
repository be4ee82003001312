use thiserror::Error;
use uuid::Uuid;

/// Errors raised by layer and path operations on a [`crate::Document`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DocumentError {
    #[error("layer {0} does not exist")]
    LayerNotFound(Uuid),

    #[error("path {0} does not exist on layer {1}")]
    PathNotFound(usize, Uuid),

    #[error("layer \"{0}\" is locked")]
    LayerLocked(String),

    #[error("layer \"{0}\" is hidden")]
    LayerHidden(String),

    #[error("a document needs at least one layer")]
    LastLayer,

    #[error("layer index {index} is out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors that can occur during command execution
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommandError {
    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("empty batch")]
    EmptyBatch,

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Errors that can occur while exporting the canvas
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: every layer is hidden or empty")]
    NothingVisible,

    #[error("canvas size {0}x{1} cannot be rasterized")]
    InvalidSize(u32, u32),

    #[error("export is not available on this platform")]
    Unsupported,

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors from the ambient audio backend
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoDevice,

    #[error("audio playback is not compiled in (enable the `audio` feature)")]
    Disabled,

    #[error("audio backend error: {0}")]
    Backend(String),
}
