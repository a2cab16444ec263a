//! Tool system: interactive state machines driven by pointer and key input.

mod arc;
mod circle;
mod line;
mod polyline;
mod rectangle;
mod select;

pub use arc::ArcTool;
pub use circle::CircleTool;
pub use line::LineTool;
pub use polyline::PolylineTool;
pub use rectangle::RectangleTool;
pub use select::SelectTool;

use crate::editor::Editor;
use crate::entity::{EntityId, Geometry};
use crate::input::{KeyInput, PointerInput};
use crate::scene::{Preview, Scene};
use crate::snap::{nearest_snap, ortho_point, snap_targets};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Line,
    Circle,
    Arc,
    Polyline,
    Rectangle,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Select,
        ToolKind::Line,
        ToolKind::Circle,
        ToolKind::Arc,
        ToolKind::Polyline,
        ToolKind::Rectangle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Line => "line",
            ToolKind::Circle => "circle",
            ToolKind::Arc => "arc",
            ToolKind::Polyline => "polyline",
            ToolKind::Rectangle => "rectangle",
        }
    }

    /// Tools that commit new entities.
    pub fn is_drawing(self) -> bool {
        self != ToolKind::Select
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a tool handled a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    Ignored,
}

/// Everything a tool may touch while handling one event.
pub struct ToolContext<'a> {
    pub editor: &'a mut Editor,
    /// Scene built from the current document, for hit testing.
    pub scene: &'a Scene,
    /// View zoom, used to turn pixel tolerances into document units.
    pub zoom: f64,
}

impl<'a> ToolContext<'a> {
    pub fn new(editor: &'a mut Editor, scene: &'a Scene, zoom: f64) -> Self {
        Self {
            editor,
            scene,
            zoom,
        }
    }

    /// Pick radius in document units.
    pub fn hit_tolerance(&self) -> f64 {
        self.editor.config().hit_tolerance_px / self.zoom
    }

    /// Object snap capture radius in document units.
    pub fn snap_tolerance(&self) -> f64 {
        self.editor.config().snap_tolerance_px / self.zoom
    }

    /// Apply drawing aids to a raw pointer position.
    ///
    /// Object snap wins over ortho. Ortho needs a reference point.
    pub fn resolve_point(&self, raw: Point, reference: Option<Point>) -> Point {
        let settings = self.editor.settings();
        if settings.osnap && settings.snap_modes.any() {
            let targets = snap_targets(self.editor.document(), &settings.snap_modes);
            if let Some(target) = nearest_snap(raw, &targets, self.snap_tolerance()) {
                return target.point;
            }
        }
        match reference {
            Some(reference) if settings.ortho => ortho_point(reference, raw),
            _ => raw,
        }
    }

    /// Commit geometry from a drawing tool and remember it as the last
    /// command.
    pub fn commit(&mut self, tool: ToolKind, geometry: Geometry) -> Option<EntityId> {
        match self.editor.commit_geometry(geometry) {
            Ok(id) => {
                self.editor.set_last_command(Some(tool));
                Some(id)
            }
            Err(err) => {
                log::warn!("{tool} tool failed to commit: {err}");
                None
            }
        }
    }
}

/// An interactive tool.
///
/// Tools keep only their own gesture state. Everything else is reached
/// through the [`ToolContext`].
pub trait Tool: fmt::Debug {
    fn kind(&self) -> ToolKind;

    fn activate(&mut self, _ctx: &mut ToolContext<'_>) {}

    /// Called when switching away. Discards any pending gesture.
    fn deactivate(&mut self, ctx: &mut ToolContext<'_>);

    fn handle_down(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput);

    fn handle_move(&mut self, _ctx: &mut ToolContext<'_>, _input: &PointerInput) {}

    fn handle_up(&mut self, _ctx: &mut ToolContext<'_>, _input: &PointerInput) {}

    fn handle_key(&mut self, _ctx: &mut ToolContext<'_>, _input: &KeyInput) -> KeyOutcome {
        KeyOutcome::Ignored
    }

    /// Ephemeral geometry for the current gesture.
    fn preview(&self) -> Option<Preview>;

    /// True when no gesture is in progress.
    fn is_idle(&self) -> bool;

    /// Command line prompt for the current state.
    fn prompt(&self) -> &'static str;
}

fn build_tool(kind: ToolKind) -> Box<dyn Tool> {
    match kind {
        ToolKind::Select => Box::new(SelectTool::default()),
        ToolKind::Line => Box::new(LineTool::default()),
        ToolKind::Circle => Box::new(CircleTool::default()),
        ToolKind::Arc => Box::new(ArcTool::default()),
        ToolKind::Polyline => Box::new(PolylineTool::default()),
        ToolKind::Rectangle => Box::new(RectangleTool::default()),
    }
}

/// Holds one instance of every tool and routes events to the active one.
#[derive(Debug)]
pub struct ToolManager {
    tools: Vec<Box<dyn Tool>>,
    active: Option<usize>,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolManager {
    /// Create a tool manager with no active tool.
    pub fn new() -> Self {
        Self {
            tools: ToolKind::ALL.into_iter().map(build_tool).collect(),
            active: None,
        }
    }

    fn index(&self, kind: ToolKind) -> Option<usize> {
        self.tools.iter().position(|tool| tool.kind() == kind)
    }

    /// Deactivate the current tool, then activate `kind`.
    pub fn activate_tool(&mut self, kind: ToolKind, ctx: &mut ToolContext<'_>) {
        self.deactivate_tool(ctx);
        let Some(index) = self.index(kind) else {
            log::warn!("No tool registered for {kind}");
            return;
        };
        self.tools[index].activate(ctx);
        self.active = Some(index);
        log::debug!("Activated {kind} tool");
    }

    /// Deactivate the current tool, if any.
    pub fn deactivate_tool(&mut self, ctx: &mut ToolContext<'_>) {
        if let Some(index) = self.active.take() {
            self.tools[index].deactivate(ctx);
        }
    }

    pub fn active(&self) -> Option<&dyn Tool> {
        self.active.map(|index| self.tools[index].as_ref())
    }

    fn active_mut(&mut self) -> Option<&mut Box<dyn Tool>> {
        self.active.map(|index| &mut self.tools[index])
    }

    pub fn active_kind(&self) -> Option<ToolKind> {
        self.active().map(|tool| tool.kind())
    }

    pub fn handle_down(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        if let Some(tool) = self.active_mut() {
            tool.handle_down(ctx, input);
        }
    }

    pub fn handle_move(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        if let Some(tool) = self.active_mut() {
            tool.handle_move(ctx, input);
        }
    }

    pub fn handle_up(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        if let Some(tool) = self.active_mut() {
            tool.handle_up(ctx, input);
        }
    }

    pub fn handle_key(&mut self, ctx: &mut ToolContext<'_>, input: &KeyInput) -> KeyOutcome {
        match self.active_mut() {
            Some(tool) => tool.handle_key(ctx, input),
            None => KeyOutcome::Ignored,
        }
    }

    pub fn preview(&self) -> Option<Preview> {
        self.active().and_then(|tool| tool.preview())
    }

    /// Prompt of the active tool, or the idle command prompt.
    pub fn prompt(&self) -> &'static str {
        self.active().map_or("Command:", |tool| tool.prompt())
    }

    /// True when no tool has a gesture in progress.
    pub fn is_idle(&self) -> bool {
        self.active().is_none_or(|tool| tool.is_idle())
    }
}
