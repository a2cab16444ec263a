//! Pick and box selection.

use super::{KeyOutcome, Tool, ToolContext, ToolKind};
use crate::input::{Key, KeyInput, PointerInput};
use crate::scene::Preview;
use kurbo::{Point, Rect};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum SelectState {
    #[default]
    Idle,
    DraggingBox {
        anchor: Point,
        current: Point,
    },
}

/// Click to pick, shift-click to toggle, drag on empty space for a
/// selection window.
#[derive(Debug, Default)]
pub struct SelectTool {
    state: SelectState,
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.state = SelectState::Idle;
    }

    fn handle_down(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        let point = input.position;
        let shift = input.modifiers.shift;

        if let Some(id) = ctx.scene.hit_test(point, ctx.hit_tolerance()) {
            self.state = SelectState::Idle;
            if shift {
                ctx.editor.toggle_selected(id);
            } else {
                ctx.editor.set_selection([id]);
            }
            return;
        }

        if !shift {
            ctx.editor.clear_selection();
        }
        self.state = SelectState::DraggingBox {
            anchor: point,
            current: point,
        };
    }

    fn handle_move(&mut self, _ctx: &mut ToolContext<'_>, input: &PointerInput) {
        if let SelectState::DraggingBox { current, .. } = &mut self.state {
            *current = input.position;
        }
    }

    fn handle_up(&mut self, ctx: &mut ToolContext<'_>, input: &PointerInput) {
        let SelectState::DraggingBox { anchor, .. } = self.state else {
            return;
        };
        self.state = SelectState::Idle;

        let rect = Rect::from_points(anchor, input.position);
        let ids = ctx.scene.ids_inside(rect);
        ctx.editor.add_to_selection(ids);
    }

    fn handle_key(&mut self, ctx: &mut ToolContext<'_>, input: &KeyInput) -> KeyOutcome {
        match input.key {
            key if key.is_delete() && !ctx.editor.selection().is_empty() => {
                ctx.editor.delete_selection();
                KeyOutcome::Consumed
            }
            // Left unconsumed so the cancel shortcut still runs.
            Key::Escape => {
                self.state = SelectState::Idle;
                ctx.editor.clear_selection();
                KeyOutcome::Ignored
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn preview(&self) -> Option<Preview> {
        match self.state {
            SelectState::DraggingBox { anchor, current } => {
                Some(Preview::SelectionBox(Rect::from_points(anchor, current)))
            }
            SelectState::Idle => None,
        }
    }

    fn is_idle(&self) -> bool {
        self.state == SelectState::Idle
    }

    fn prompt(&self) -> &'static str {
        match self.state {
            SelectState::Idle => "Select objects or drag to create a selection window.",
            SelectState::DraggingBox { .. } => "Specify opposite corner:",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Geometry;
    use crate::input::Modifiers;
    use crate::layer::{Layer, LayerPatch};
    use crate::tools::test_support::Harness;

    fn harness_with_lines() -> (Harness<SelectTool>, uuid::Uuid, uuid::Uuid) {
        let mut h = Harness::new(SelectTool::default());
        let a = h
            .editor
            .commit_geometry(Geometry::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)))
            .unwrap();
        let b = h
            .editor
            .commit_geometry(Geometry::line(Point::new(0.0, 20.0), Point::new(10.0, 20.0)))
            .unwrap();
        (h, a, b)
    }

    #[test]
    fn test_click_replaces_selection() {
        let (mut h, a, b) = harness_with_lines();
        h.click(5.0, 1.0);
        assert_eq!(h.editor.selection().to_vec(), vec![a]);
        h.click(5.0, 19.0);
        assert_eq!(h.editor.selection().to_vec(), vec![b]);

        h.editor.set_selection([a, b]);
        h.click(5.0, 1.0);
        assert_eq!(h.editor.selection().to_vec(), vec![a]);
    }

    #[test]
    fn test_hit_after_lost_release_stays_idle() {
        let (mut h, a, _) = harness_with_lines();
        // Box drag whose release never arrived.
        h.down(PointerInput::at(-50.0, -50.0));
        assert!(!h.tool.is_idle());

        h.down(PointerInput::at(5.0, 0.0));
        assert!(h.tool.is_idle());
        assert_eq!(h.editor.selection().to_vec(), vec![a]);
        assert_eq!(
            h.tool.prompt(),
            "Select objects or drag to create a selection window."
        );

        h.up(PointerInput::at(5.0, 0.0));
        assert_eq!(h.editor.selection().to_vec(), vec![a]);
    }

    #[test]
    fn test_shift_click_toggles() {
        let (mut h, a, b) = harness_with_lines();
        h.click(5.0, 0.0);
        h.down(PointerInput::at(5.0, 20.0).shift());
        assert!(h.editor.selection().contains(a));
        assert!(h.editor.selection().contains(b));

        h.down(PointerInput::at(5.0, 0.0).shift());
        assert_eq!(h.editor.selection().to_vec(), vec![b]);
    }

    #[test]
    fn test_hit_tolerance_scales_with_zoom() {
        let (mut h, a, _) = harness_with_lines();
        h.zoom = 4.0;
        h.click(5.0, 3.0);
        assert!(h.editor.selection().is_empty());
        h.zoom = 0.5;
        h.click(5.0, 8.0);
        assert_eq!(h.editor.selection().to_vec(), vec![a]);
    }

    #[test]
    fn test_box_selects_fully_contained() {
        let (mut h, a, b) = harness_with_lines();
        h.down(PointerInput::at(-5.0, -5.0));
        h.move_to(15.0, 5.0);
        assert_eq!(
            h.tool.preview(),
            Some(Preview::SelectionBox(Rect::new(-5.0, -5.0, 15.0, 5.0)))
        );
        h.up(PointerInput::at(15.0, 5.0));
        assert_eq!(h.editor.selection().to_vec(), vec![a]);
        assert!(h.tool.is_idle());

        // A shift box unions with the existing selection.
        h.down(PointerInput::at(15.0, 25.0).shift());
        h.up(PointerInput::at(-5.0, 15.0));
        assert!(h.editor.selection().contains(a));
        assert!(h.editor.selection().contains(b));

        // A plain click on empty space clears it.
        h.click(50.0, 50.0);
        assert!(h.editor.selection().is_empty());
    }

    #[test]
    fn test_box_partially_covering_selects_nothing() {
        let (mut h, _, _) = harness_with_lines();
        h.down(PointerInput::at(-5.0, -5.0));
        h.up(PointerInput::at(5.0, 5.0));
        assert!(h.editor.selection().is_empty());
    }

    #[test]
    fn test_locked_layer_is_not_pickable() {
        let mut h = Harness::new(SelectTool::default());
        h.editor.add_layer(Layer::new("locked", "Locked")).unwrap();
        h.editor.set_active_layer("locked").unwrap();
        h.editor
            .commit_geometry(Geometry::line(Point::ZERO, Point::new(10.0, 0.0)))
            .unwrap();
        h.editor
            .update_layer("locked", LayerPatch::locked(true))
            .unwrap();

        h.click(5.0, 0.0);
        assert!(h.editor.selection().is_empty());
    }

    #[test]
    fn test_delete_key_removes_selection() {
        let (mut h, a, b) = harness_with_lines();
        h.click(5.0, 0.0);
        assert_eq!(h.key(Key::Delete), KeyOutcome::Consumed);
        assert!(!h.editor.document().contains_entity(a));
        assert!(h.editor.document().contains_entity(b));
        assert!(h.editor.selection().is_empty());

        // Nothing selected: left for the shortcut table.
        assert_eq!(h.key(Key::Backspace), KeyOutcome::Ignored);
        assert!(h.editor.undo());
        assert!(h.editor.document().contains_entity(a));
    }

    #[test]
    fn test_escape_clears_selection() {
        let (mut h, _, _) = harness_with_lines();
        h.click(5.0, 0.0);
        h.down(PointerInput::at(100.0, 100.0).with_modifiers(Modifiers::SHIFT));
        assert!(!h.tool.is_idle());
        h.key(Key::Escape);
        assert!(h.tool.is_idle());
        assert!(h.editor.selection().is_empty());
    }
}
