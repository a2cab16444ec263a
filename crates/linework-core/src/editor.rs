//! Application state: the undoable document plus transient editor state.

use crate::config::{EditorConfig, EditorSettings, UiState};
use crate::document::Document;
use crate::entity::{Entity, EntityId, EntityPatch, Geometry};
use crate::error::DocumentResult;
use crate::history::History;
use crate::layer::{Layer, LayerId, LayerPatch};
use crate::selection::Selection;
use crate::snap::SnapMode;
use crate::tools::ToolKind;
use uuid::Uuid;

/// Change notifications queued by the editor.
///
/// Collaborators drain them with [`Editor::poll_events`] after each input
/// to decide what needs redrawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    DocumentChanged,
    SelectionChanged,
    ToolChanged(ToolKind),
    SettingsChanged,
    LastCommandChanged,
}

/// State that is not part of the undo history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    pub active_tool: ToolKind,
    pub selection: Selection,
    /// Drawing tool repeated by space/enter.
    pub last_command: Option<ToolKind>,
    pub settings: EditorSettings,
    pub ui: UiState,
}

/// The editing engine's state object.
#[derive(Debug, Clone)]
pub struct Editor {
    history: History,
    state: EditorState,
    config: EditorConfig,
    events: Vec<EditorEvent>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor over an empty document.
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(Document::new(), config)
    }

    /// Create an editor over an existing document.
    pub fn with_document(document: Document, config: EditorConfig) -> Self {
        let state = EditorState {
            settings: config.settings.clone(),
            ui: config.ui.clone(),
            ..EditorState::default()
        };
        Self {
            history: History::with_limit(document, config.undo_limit),
            state,
            config,
            events: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        self.history.document()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.state.settings
    }

    pub fn selection(&self) -> &Selection {
        &self.state.selection
    }

    pub fn active_tool(&self) -> ToolKind {
        self.state.active_tool
    }

    pub fn last_command(&self) -> Option<ToolKind> {
        self.state.last_command
    }

    /// Document revision, bumped on every change including undo/redo.
    pub fn revision(&self) -> u64 {
        self.history.revision()
    }

    /// Drain queued change notifications.
    pub fn poll_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: EditorEvent) {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
    }

    /// Run a document mutation as one history step.
    fn mutate<T>(
        &mut self,
        mutation: impl FnOnce(&mut Document) -> DocumentResult<T>,
    ) -> DocumentResult<T> {
        let before = self.history.revision();
        let result = self.history.apply(mutation);
        if let Err(err) = &result {
            log::warn!("Rejected document mutation: {err}");
        }
        if self.history.revision() != before {
            self.emit(EditorEvent::DocumentChanged);
        }
        result
    }

    // --- Document mutations ---

    pub fn add_entity(&mut self, entity: Entity) -> DocumentResult<EntityId> {
        let id = entity.id();
        self.mutate(|doc| doc.add_entity(entity))?;
        log::debug!("Added entity {id}");
        Ok(id)
    }

    /// Returns `Ok(false)` when the entity does not exist.
    pub fn update_entity(&mut self, id: EntityId, patch: EntityPatch) -> DocumentResult<bool> {
        self.mutate(|doc| doc.update_entity(id, patch))
    }

    /// Delete entities and drop them from the selection.
    ///
    /// Returns the ids actually removed.
    pub fn delete_entities(&mut self, ids: &[EntityId]) -> Vec<EntityId> {
        let removed = match self.mutate(|doc| Ok(doc.delete_entities(ids))) {
            Ok(removed) => removed,
            Err(_) => Vec::new(),
        };
        if self.state.selection.retain(|id| !ids.contains(&id)) {
            self.emit(EditorEvent::SelectionChanged);
        }
        if !removed.is_empty() {
            log::debug!("Deleted {} entities", removed.len());
        }
        removed
    }

    /// Delete every selected entity.
    pub fn delete_selection(&mut self) -> Vec<EntityId> {
        let ids = self.state.selection.to_vec();
        if ids.is_empty() {
            return Vec::new();
        }
        self.delete_entities(&ids)
    }

    pub fn add_layer(&mut self, layer: Layer) -> DocumentResult<()> {
        self.mutate(|doc| doc.add_layer(layer))
    }

    /// Add a fresh "Layer N" and make it active, as one undo step.
    pub fn create_layer(&mut self) -> DocumentResult<LayerId> {
        let id = Uuid::new_v4().to_string();
        let name = format!("Layer {}", self.document().layer_count() + 1);
        let layer = Layer::new(id.clone(), name);
        let layer_id = id.clone();
        self.mutate(move |doc| {
            doc.add_layer(layer)?;
            doc.set_active_layer(&layer_id)
        })?;
        log::debug!("Created layer {id}");
        Ok(id)
    }

    /// Returns `Ok(false)` when the layer does not exist.
    pub fn update_layer(&mut self, id: &str, patch: LayerPatch) -> DocumentResult<bool> {
        self.mutate(|doc| doc.update_layer(id, patch))
    }

    /// Delete a layer. The default layer is never deleted.
    pub fn delete_layer(&mut self, id: &str) -> bool {
        let deleted = self
            .mutate(|doc| Ok(doc.delete_layer(id)))
            .unwrap_or(false);
        if !deleted {
            log::debug!("Layer {id} not deleted");
        }
        deleted
    }

    pub fn set_active_layer(&mut self, id: &str) -> DocumentResult<()> {
        self.mutate(|doc| doc.set_active_layer(id))
    }

    /// Add new geometry on the active layer.
    pub fn commit_geometry(&mut self, geometry: Geometry) -> DocumentResult<EntityId> {
        let kind = geometry.kind();
        let entity = Entity::new(self.document().active_layer_id(), geometry);
        let id = self.add_entity(entity)?;
        log::debug!("Committed {kind} {id}");
        Ok(id)
    }

    /// Replace the document, forgetting history and selection.
    pub fn load_document(&mut self, document: Document) -> DocumentResult<()> {
        document.check_invariants()?;
        self.history.reset(document);
        self.emit(EditorEvent::DocumentChanged);
        self.clear_selection();
        log::debug!("Loaded document with {} entities", self.document().len());
        Ok(())
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        log::debug!("Undo");
        self.after_history_step();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        log::debug!("Redo");
        self.after_history_step();
        true
    }

    fn after_history_step(&mut self) {
        self.emit(EditorEvent::DocumentChanged);
        let document = self.history.document();
        if self
            .state
            .selection
            .retain(|id| document.contains_entity(id))
        {
            self.emit(EditorEvent::SelectionChanged);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Selection ---

    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        if self.state.selection.replace(ids) {
            self.emit(EditorEvent::SelectionChanged);
        }
    }

    pub fn add_to_selection(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        if self.state.selection.extend(ids) {
            self.emit(EditorEvent::SelectionChanged);
        }
    }

    pub fn toggle_selected(&mut self, id: EntityId) {
        self.state.selection.toggle(id);
        self.emit(EditorEvent::SelectionChanged);
    }

    pub fn clear_selection(&mut self) {
        if self.state.selection.clear() {
            self.emit(EditorEvent::SelectionChanged);
        }
    }

    // --- Tools ---

    /// Switch tools. A different tool clears the selection.
    pub fn set_active_tool(&mut self, tool: ToolKind) {
        if self.state.active_tool == tool {
            return;
        }
        log::debug!("Active tool: {:?} -> {:?}", self.state.active_tool, tool);
        self.state.active_tool = tool;
        self.emit(EditorEvent::ToolChanged(tool));
        self.clear_selection();
    }

    pub fn set_last_command(&mut self, command: Option<ToolKind>) {
        if self.state.last_command != command {
            self.state.last_command = command;
            self.emit(EditorEvent::LastCommandChanged);
        }
    }

    /// Re-activate the last drawing command. Returns the tool, if any.
    pub fn repeat_last_command(&mut self) -> Option<ToolKind> {
        let command = self.state.last_command?;
        self.set_active_tool(command);
        Some(command)
    }

    // --- Settings ---

    pub fn toggle_grid(&mut self) -> bool {
        self.state.settings.grid_visible = !self.state.settings.grid_visible;
        self.emit(EditorEvent::SettingsChanged);
        self.state.settings.grid_visible
    }

    pub fn toggle_ortho(&mut self) -> bool {
        self.state.settings.ortho = !self.state.settings.ortho;
        self.emit(EditorEvent::SettingsChanged);
        self.state.settings.ortho
    }

    pub fn toggle_osnap(&mut self) -> bool {
        self.state.settings.osnap = !self.state.settings.osnap;
        self.emit(EditorEvent::SettingsChanged);
        self.state.settings.osnap
    }

    pub fn set_snap_mode(&mut self, mode: SnapMode, enabled: bool) {
        if self.state.settings.snap_modes.contains(mode) != enabled {
            self.state.settings.snap_modes.set(mode, enabled);
            self.emit(EditorEvent::SettingsChanged);
        }
    }

    pub fn toggle_layer_panel(&mut self) -> bool {
        self.state.ui.layer_panel_open = !self.state.ui.layer_panel_open;
        self.emit(EditorEvent::SettingsChanged);
        self.state.ui.layer_panel_open
    }
}
