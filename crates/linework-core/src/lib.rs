//! Linework Core Library
//!
//! Platform-agnostic editing engine for the Linework 2D CAD editor: the
//! layered entity document, snapshot undo/redo, interactive drawing tools
//! and the render scene handed to the canvas collaborator.

pub mod canvas;
pub mod config;
pub mod document;
pub mod editor;
pub mod entity;
pub mod error;
pub mod history;
pub mod input;
pub mod layer;
pub mod scene;
pub mod selection;
pub mod shortcuts;
pub mod snap;
pub mod tools;

pub use canvas::Canvas;
pub use config::{ConfigError, EditorConfig, EditorSettings, UiState};
pub use document::Document;
pub use editor::{Editor, EditorEvent, EditorState};
pub use entity::{Entity, EntityId, EntityPatch, Geometry, GeometryKind};
pub use error::{DocumentError, DocumentResult};
pub use history::{DEFAULT_UNDO_LIMIT, History};
pub use input::{Key, KeyInput, Modifiers, MouseButton, PointerInput};
pub use layer::{DEFAULT_LAYER_ID, Layer, LayerColor, LayerId, LayerPatch, LineStyle};
pub use scene::{Preview, PreviewItem, Scene, SceneItem, StrokeStyle};
pub use selection::Selection;
pub use shortcuts::{Command, KeyChord, Shortcut, ShortcutMatcher, ShortcutRegistry};
pub use snap::{SnapMode, SnapModes, SnapTarget, nearest_snap, ortho_point, snap_targets};
pub use tools::{KeyOutcome, Tool, ToolContext, ToolKind, ToolManager};
