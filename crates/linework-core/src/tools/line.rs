//! Chained line placement.

use super::{KeyOutcome, Tool, ToolContext, ToolKind};
use crate::entity::Geometry;
use crate::input::{Key, KeyInput, PointerInput};
use crate::scene::Preview;
use kurbo::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum LineState {
    #[default]
    WaitingFirstPoint,
    WaitingNextPoint {
        start: Point,
        cursor: Point,
    },
}

/// Each click after the first commits a line and starts the next one at
/// its end point.
#[derive(Debug, Default)]
pub struct LineTool {
    state: LineState,
}

impl LineTool {
    fn reset(&mut self) {
        self.state = LineState::WaitingFirstPoint;
    }
}

impl Tool for LineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Line
    }

    fn activate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.reset();
    }

    fn deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.reset();
    }

    fn handle_down(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        match self.state {
            LineState::WaitingFirstPoint => {
                let start = ctx.resolve_point(input.position, None);
                self.state = LineState::WaitingNextPoint {
                    start,
                    cursor: start,
                };
            }
            LineState::WaitingNextPoint { start, .. } => {
                let end = ctx.resolve_point(input.position, Some(start));
                if end == start {
                    log::debug!("Ignoring zero-length line");
                    return;
                }
                ctx.commit(ToolKind::Line, Geometry::line(start, end));
                self.state = LineState::WaitingNextPoint {
                    start: end,
                    cursor: end,
                };
            }
        }
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        if let LineState::WaitingNextPoint { start, cursor } = &mut self.state {
            *cursor = ctx.resolve_point(input.position, Some(*start));
        }
    }

    fn handle_key(&mut self, _ctx: &mut ToolContext<'_>, input: &KeyInput) -> KeyOutcome {
        if self.is_idle() {
            return KeyOutcome::Ignored;
        }
        match input.key {
            key if key == Key::Escape || key.is_confirm() => {
                self.reset();
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn preview(&self) -> Option<Preview> {
        match self.state {
            LineState::WaitingNextPoint { start, cursor } => Some(Preview::Line {
                from: start,
                to: cursor,
            }),
            LineState::WaitingFirstPoint => None,
        }
    }

    fn is_idle(&self) -> bool {
        self.state == LineState::WaitingFirstPoint
    }

    fn prompt(&self) -> &'static str {
        match self.state {
            LineState::WaitingFirstPoint => "Specify first point:",
            LineState::WaitingNextPoint { .. } => "Specify next point or [Enter] to finish:",
        }
    }
}
