#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod audio;
pub mod color;
pub mod command;
pub mod components;
pub mod document;
pub mod error;
pub mod export;
pub mod geometry;
pub mod gradient;
pub mod id_generator;
pub mod input;
pub mod layer;
pub mod mood;
pub mod panels;
pub mod path;
pub mod renderer;
pub mod settings;
pub mod storage;
pub mod tools;
pub mod util;
pub mod view;
pub mod wellness;

pub use app::MindfulCanvasApp;
pub use command::{Command, CommandHistory};
pub use document::Document;
pub use layer::{Layer, LayerId};
pub use path::{Fill, Path, PathStyle};
pub use renderer::Renderer;
pub use tools::{Tool, ToolKind, ToolType};
pub use view::ViewTransform;
