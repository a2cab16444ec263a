//! Editing session: routes input to the active tool and keyboard shortcuts.

use crate::config::EditorConfig;
use crate::document::Document;
use crate::editor::{Editor, EditorEvent};
use crate::error::DocumentResult;
use crate::input::{KeyInput, MouseButton, PointerInput};
use crate::scene::{Preview, PreviewItem, Scene};
use crate::shortcuts::{Command, ShortcutMatcher, ShortcutRegistry};
use crate::tools::{KeyOutcome, ToolContext, ToolKind, ToolManager};

/// Binds the editor, the tool dispatcher and the shortcut table.
///
/// After every event the dispatcher is brought in line with the editor's
/// active tool, so switching tools from anywhere resets the previous one.
#[derive(Debug)]
pub struct Canvas {
    editor: Editor,
    tools: ToolManager,
    shortcuts: ShortcutRegistry,
    matcher: ShortcutMatcher,
    scene: Scene,
    scene_revision: u64,
    zoom: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Canvas {
    /// Create a canvas over an empty document.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_editor(Editor::new(config))
    }

    /// Create a canvas around an existing editor.
    pub fn with_editor(editor: Editor) -> Self {
        let scene = Scene::build(editor.document());
        let scene_revision = editor.revision();
        let mut canvas = Self {
            editor,
            tools: ToolManager::new(),
            shortcuts: ShortcutRegistry::default(),
            matcher: ShortcutMatcher::new(),
            scene,
            scene_revision,
            zoom: 1.0,
        };
        canvas.sync();
        canvas
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn document(&self) -> &Document {
        self.editor.document()
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    /// The render scene for the current document.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn shortcuts(&self) -> &ShortcutRegistry {
        &self.shortcuts
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutRegistry {
        &mut self.shortcuts
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the view zoom. Non-positive or non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        } else {
            log::warn!("Ignoring invalid zoom {zoom}");
        }
    }

    /// Run an editor call (layer panel, toolbar, ...) and resynchronise.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut Editor) -> R) -> R {
        let result = f(&mut self.editor);
        self.sync();
        result
    }

    /// Replace the document, forgetting history.
    pub fn load_document(&mut self, document: Document) -> DocumentResult<()> {
        let result = self.editor.load_document(document);
        self.sync();
        result
    }

    /// Drain editor change notifications.
    pub fn poll_events(&mut self) -> Vec<EditorEvent> {
        self.editor.poll_events()
    }

    pub fn preview(&self) -> Option<Preview> {
        self.tools.preview()
    }

    /// Styled preview for the renderer.
    pub fn preview_item(&self) -> Option<PreviewItem> {
        self.preview().map(|preview| preview.to_item())
    }

    /// Command line prompt for the active tool.
    pub fn prompt(&self) -> &'static str {
        self.tools.prompt()
    }

    pub fn pointer_down(&mut self, input: PointerInput) {
        if input.button != MouseButton::Left {
            return;
        }
        // A pointer gesture ends any pending key sequence.
        self.matcher.reset();
        let mut ctx = ToolContext::new(&mut self.editor, &self.scene, self.zoom);
        self.tools.handle_down(&mut ctx, &input);
        self.sync();
    }

    pub fn pointer_move(&mut self, input: PointerInput) {
        let mut ctx = ToolContext::new(&mut self.editor, &self.scene, self.zoom);
        self.tools.handle_move(&mut ctx, &input);
        self.sync();
    }

    pub fn pointer_up(&mut self, input: PointerInput) {
        if input.button != MouseButton::Left {
            return;
        }
        let mut ctx = ToolContext::new(&mut self.editor, &self.scene, self.zoom);
        self.tools.handle_up(&mut ctx, &input);
        self.sync();
    }

    /// Offer a key to the active tool, then to the shortcut table.
    ///
    /// Returns the shortcut command that ran, if any.
    pub fn key_down(&mut self, input: KeyInput) -> Option<Command> {
        let mut ctx = ToolContext::new(&mut self.editor, &self.scene, self.zoom);
        let outcome = self.tools.handle_key(&mut ctx, &input);

        let command = match outcome {
            KeyOutcome::Consumed => {
                self.matcher.reset();
                None
            }
            KeyOutcome::Ignored => self.matcher.feed(&self.shortcuts, input),
        };
        match command {
            Some(command) => self.execute(command),
            None => self.sync(),
        }
        command
    }

    /// Run a command and resynchronise the tools.
    pub fn execute(&mut self, command: Command) {
        log::debug!("Executing {command:?}");
        match command {
            Command::ActivateTool(kind) => {
                self.editor.set_active_tool(kind);
                if kind.is_drawing() {
                    self.editor.set_last_command(Some(kind));
                }
            }
            Command::Cancel => {
                self.editor.set_active_tool(ToolKind::Select);
                self.editor.set_last_command(None);
                // Also resets a select tool that was already active.
                let mut ctx = ToolContext::new(&mut self.editor, &self.scene, self.zoom);
                self.tools.deactivate_tool(&mut ctx);
            }
            Command::RepeatLastCommand => {
                self.editor.repeat_last_command();
            }
            Command::DeleteSelection => {
                self.editor.delete_selection();
            }
            Command::Undo => {
                self.editor.undo();
            }
            Command::Redo => {
                self.editor.redo();
            }
            Command::ToggleGrid => {
                self.editor.toggle_grid();
            }
            Command::ToggleOrtho => {
                self.editor.toggle_ortho();
            }
            Command::ToggleOsnap => {
                self.editor.toggle_osnap();
            }
            Command::ToggleLayerPanel => {
                self.editor.toggle_layer_panel();
            }
        }
        self.sync();
    }

    fn refresh_scene(&mut self) {
        let revision = self.editor.revision();
        if revision != self.scene_revision {
            self.scene = Scene::build(self.editor.document());
            self.scene_revision = revision;
        }
    }

    /// Rebuild a stale scene and follow the editor's active tool.
    pub fn sync(&mut self) {
        self.refresh_scene();
        let wanted = self.editor.active_tool();
        if self.tools.active_kind() != Some(wanted) {
            let mut ctx = ToolContext::new(&mut self.editor, &self.scene, self.zoom);
            self.tools.activate_tool(wanted, &mut ctx);
        }
    }
}
