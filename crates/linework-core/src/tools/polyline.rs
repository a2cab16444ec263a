//! Multi-vertex polyline placement.

use super::{KeyOutcome, Tool, ToolContext, ToolKind};
use crate::entity::Geometry;
use crate::input::{Key, KeyInput, Modifiers, PointerInput};
use crate::scene::Preview;
use kurbo::Point;

/// Clicks append vertices. Enter or space finishes an open polyline, `c`
/// closes it.
#[derive(Debug, Default)]
pub struct PolylineTool {
    points: Vec<Point>,
    cursor: Option<Point>,
}

impl PolylineTool {
    fn reset(&mut self) {
        self.points.clear();
        self.cursor = None;
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>, closed: bool) {
        let needed = if closed { 3 } else { 2 };
        if self.points.len() >= needed {
            let points = std::mem::take(&mut self.points);
            ctx.commit(ToolKind::Polyline, Geometry::polyline(points, closed));
        } else {
            log::debug!("Discarding polyline with {} points", self.points.len());
        }
        self.reset();
    }
}

impl Tool for PolylineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Polyline
    }

    fn activate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.reset();
    }

    fn deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.reset();
    }

    fn handle_down(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        let last = self.points.last().copied();
        let point = ctx.resolve_point(input.position, last);
        if last == Some(point) {
            return;
        }
        self.points.push(point);
        self.cursor = None;
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        if let Some(&last) = self.points.last() {
            self.cursor = Some(ctx.resolve_point(input.position, Some(last)));
        }
    }

    fn handle_key(&mut self, ctx: &mut ToolContext<'_>, input: &KeyInput) -> KeyOutcome {
        if self.is_idle() {
            return KeyOutcome::Ignored;
        }
        match input.key {
            key if key.is_confirm() => self.finish(ctx, false),
            Key::Char('c') if input.modifiers == Modifiers::NONE => self.finish(ctx, true),
            Key::Escape => self.reset(),
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Consumed
    }

    fn preview(&self) -> Option<Preview> {
        if self.points.is_empty() {
            return None;
        }
        let mut points = self.points.clone();
        points.extend(self.cursor);
        (points.len() >= 2).then_some(Preview::Polyline {
            points,
            closed: false,
        })
    }

    fn is_idle(&self) -> bool {
        self.points.is_empty()
    }

    fn prompt(&self) -> &'static str {
        match self.points.len() {
            0 => "Specify start point:",
            1 => "Specify next point:",
            _ => "Specify next point or [Close/Enter]:",
        }
    }
}
