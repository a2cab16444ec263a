//! Two-corner rectangle placement, stored as a closed polyline.

use super::{KeyOutcome, Tool, ToolContext, ToolKind};
use crate::entity::Geometry;
use crate::input::{Key, KeyInput, PointerInput};
use crate::scene::Preview;
use kurbo::{Point, Rect};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum RectangleState {
    #[default]
    WaitingFirstCorner,
    WaitingOppositeCorner {
        corner: Point,
        cursor: Option<Point>,
    },
}

#[derive(Debug, Default)]
pub struct RectangleTool {
    state: RectangleState,
}

impl RectangleTool {
    fn reset(&mut self) {
        self.state = RectangleState::WaitingFirstCorner;
    }
}

/// Corners of the axis-aligned rectangle spanned by two points.
fn corners(a: Point, b: Point) -> Vec<Point> {
    let rect = Rect::from_points(a, b);
    vec![
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

impl Tool for RectangleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rectangle
    }

    fn activate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.reset();
    }

    fn deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.reset();
    }

    fn handle_down(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        match self.state {
            RectangleState::WaitingFirstCorner => {
                self.state = RectangleState::WaitingOppositeCorner {
                    corner: ctx.resolve_point(input.position, None),
                    cursor: None,
                };
            }
            RectangleState::WaitingOppositeCorner { corner, .. } => {
                let opposite = ctx.resolve_point(input.position, None);
                if corner.x != opposite.x && corner.y != opposite.y {
                    let geometry = Geometry::polyline(corners(corner, opposite), true);
                    ctx.commit(ToolKind::Rectangle, geometry);
                } else {
                    log::debug!("Discarding degenerate rectangle");
                }
                self.reset();
            }
        }
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        if let RectangleState::WaitingOppositeCorner { cursor, .. } = &mut self.state {
            *cursor = Some(ctx.resolve_point(input.position, None));
        }
    }

    fn handle_key(&mut self, _ctx: &mut ToolContext<'_>, input: &KeyInput) -> KeyOutcome {
        if input.key == Key::Escape && !self.is_idle() {
            self.reset();
            return KeyOutcome::Consumed;
        }
        KeyOutcome::Ignored
    }

    fn preview(&self) -> Option<Preview> {
        match self.state {
            RectangleState::WaitingOppositeCorner {
                corner,
                cursor: Some(cursor),
            } => Some(Preview::Polyline {
                points: corners(corner, cursor),
                closed: true,
            }),
            _ => None,
        }
    }

    fn is_idle(&self) -> bool {
        self.state == RectangleState::WaitingFirstCorner
    }

    fn prompt(&self) -> &'static str {
        match self.state {
            RectangleState::WaitingFirstCorner => "Specify first corner point:",
            RectangleState::WaitingOppositeCorner { .. } => "Specify other corner point:",
        }
    }
}
