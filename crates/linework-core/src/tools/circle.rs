//! Center-radius circle placement.

use super::{KeyOutcome, Tool, ToolContext, ToolKind};
use crate::entity::Geometry;
use crate::input::{Key, KeyInput, PointerInput};
use crate::scene::Preview;
use kurbo::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum CircleState {
    #[default]
    WaitingCenter,
    WaitingRadius {
        center: Point,
        radius: f64,
    },
}

/// First click sets the center, second click the radius.
#[derive(Debug, Default)]
pub struct CircleTool {
    state: CircleState,
}

impl CircleTool {
    fn reset(&mut self) {
        self.state = CircleState::WaitingCenter;
    }
}

impl Tool for CircleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Circle
    }

    fn activate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.reset();
    }

    fn deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.reset();
    }

    fn handle_down(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        match self.state {
            CircleState::WaitingCenter => {
                self.state = CircleState::WaitingRadius {
                    center: ctx.resolve_point(input.position, None),
                    radius: 0.0,
                };
            }
            CircleState::WaitingRadius { center, .. } => {
                let radius = center.distance(ctx.resolve_point(input.position, None));
                if radius > 0.0 {
                    ctx.commit(ToolKind::Circle, Geometry::circle(center, radius));
                } else {
                    log::debug!("Discarding zero-radius circle");
                }
                self.reset();
            }
        }
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        if let CircleState::WaitingRadius { center, radius } = &mut self.state {
            *radius = center.distance(ctx.resolve_point(input.position, None));
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
            CircleState::WaitingRadius { center, radius } => {
                Some(Preview::Circle { center, radius })
            }
            CircleState::WaitingCenter => None,
        }
    }

    fn is_idle(&self) -> bool {
        self.state == CircleState::WaitingCenter
    }

    fn prompt(&self) -> &'static str {
        match self.state {
            CircleState::WaitingCenter => "Specify center point:",
            CircleState::WaitingRadius { .. } => "Specify radius:",
        }
    }
}
