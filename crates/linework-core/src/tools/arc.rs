//! Three-point arc placement.

use super::{KeyOutcome, Tool, ToolContext, ToolKind};
use crate::entity::Geometry;
use crate::input::{Key, KeyInput, PointerInput};
use crate::scene::{Preview, circumcircle};
use kurbo::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum ArcState {
    #[default]
    WaitingStart,
    WaitingThrough {
        start: Point,
        cursor: Option<Point>,
    },
    WaitingEnd {
        start: Point,
        through: Point,
        cursor: Option<Point>,
    },
}

/// Start point, a point on the arc, then the end point.
#[derive(Debug, Default)]
pub struct ArcTool {
    state: ArcState,
}

impl ArcTool {
    fn reset(&mut self) {
        self.state = ArcState::WaitingStart;
    }
}

impl Tool for ArcTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Arc
    }

    fn activate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.reset();
    }

    fn deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.reset();
    }

    fn handle_down(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        match self.state {
            ArcState::WaitingStart => {
                self.state = ArcState::WaitingThrough {
                    start: ctx.resolve_point(input.position, None),
                    cursor: None,
                };
            }
            ArcState::WaitingThrough { start, .. } => {
                let through = ctx.resolve_point(input.position, Some(start));
                if through == start {
                    return;
                }
                self.state = ArcState::WaitingEnd {
                    start,
                    through,
                    cursor: None,
                };
            }
            ArcState::WaitingEnd { start, through, .. } => {
                let end = ctx.resolve_point(input.position, None);
                if circumcircle(start, through, end).is_some() {
                    ctx.commit(ToolKind::Arc, Geometry::arc(start, through, end));
                } else {
                    log::debug!("Discarding degenerate arc");
                }
                self.reset();
            }
        }
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        match &mut self.state {
            ArcState::WaitingThrough { start, cursor } => {
                *cursor = Some(ctx.resolve_point(input.position, Some(*start)));
            }
            ArcState::WaitingEnd { cursor, .. } => {
                *cursor = Some(ctx.resolve_point(input.position, None));
            }
            ArcState::WaitingStart => {}
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
            ArcState::WaitingThrough {
                start,
                cursor: Some(cursor),
            } => Some(Preview::Line {
                from: start,
                to: cursor,
            }),
            ArcState::WaitingEnd {
                start,
                through,
                cursor: Some(end),
            } => Some(Preview::Arc {
                start,
                through,
                end,
            }),
            _ => None,
        }
    }

    fn is_idle(&self) -> bool {
        self.state == ArcState::WaitingStart
    }

    fn prompt(&self) -> &'static str {
        match self.state {
            ArcState::WaitingStart => "Specify start point of arc:",
            ArcState::WaitingThrough { .. } => "Specify second point of arc:",
            ArcState::WaitingEnd { .. } => "Specify end point of arc:",
        }
    }
}
