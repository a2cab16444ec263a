//! End-to-end editing sessions driven through the canvas.

use kurbo::Point;
use linework_core::{
    Canvas, Command, DEFAULT_LAYER_ID, Document, EditorConfig, EditorEvent, Entity, EntityPatch,
    Geometry, Key, KeyInput, Layer, LayerPatch, LineStyle, PointerInput, ToolKind,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A canvas with object snap off, so clicks land exactly where given.
fn canvas() -> Canvas {
    init_logging();
    let config = EditorConfig::from_json(r#"{ "settings": { "osnap": false } }"#).unwrap();
    Canvas::new(config)
}

fn click(canvas: &mut Canvas, x: f64, y: f64) {
    canvas.pointer_down(PointerInput::at(x, y));
    canvas.pointer_up(PointerInput::at(x, y));
}

fn type_keys(canvas: &mut Canvas, keys: &[Key]) {
    for key in keys {
        canvas.key_down(KeyInput::new(*key));
    }
}

fn geometries(document: &Document) -> Vec<Geometry> {
    let mut geometries: Vec<Geometry> = document.entities().map(|e| e.geometry.clone()).collect();
    geometries.sort_by(|a, b| {
        let (pa, pb) = (a.points()[0], b.points()[0]);
        pa.x.total_cmp(&pb.x).then(pa.y.total_cmp(&pb.y))
    });
    geometries
}

#[test]
fn test_line_chain_scenario() {
    let mut canvas = canvas();
    type_keys(&mut canvas, &[Key::Char('l'), Key::Space]);
    click(&mut canvas, 0.0, 0.0);
    click(&mut canvas, 10.0, 0.0);
    assert_eq!(
        geometries(canvas.document()),
        vec![Geometry::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0))]
    );

    click(&mut canvas, 10.0, 5.0);
    assert_eq!(
        geometries(canvas.document()),
        vec![
            Geometry::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
            Geometry::line(Point::new(10.0, 0.0), Point::new(10.0, 5.0)),
        ]
    );
    assert!(canvas.document().check_invariants().is_ok());
}

#[test]
fn test_circle_scenario() {
    let mut canvas = canvas();
    canvas.execute(Command::ActivateTool(ToolKind::Circle));
    canvas.pointer_down(PointerInput::at(0.0, 0.0));
    canvas.pointer_move(PointerInput::at(5.0, 0.0));
    assert!(canvas.document().is_empty());
    assert!(canvas.preview_item().is_some());

    canvas.pointer_down(PointerInput::at(5.0, 0.0));
    assert_eq!(
        geometries(canvas.document()),
        vec![Geometry::circle(Point::ZERO, 5.0)]
    );

    // Degenerate down-down at one point commits nothing.
    canvas.pointer_down(PointerInput::at(20.0, 20.0));
    canvas.pointer_down(PointerInput::at(20.0, 20.0));
    assert_eq!(canvas.document().len(), 1);
}

#[test]
fn test_tool_switch_discards_pending_line_and_selection() {
    let mut canvas = canvas();
    let id = canvas
        .update(|editor| editor.commit_geometry(Geometry::circle(Point::new(50.0, 50.0), 5.0)))
        .unwrap();
    canvas.update(|editor| editor.set_selection([id]));

    canvas.execute(Command::ActivateTool(ToolKind::Line));
    assert!(canvas.editor().selection().is_empty());
    click(&mut canvas, 0.0, 0.0);

    canvas.execute(Command::ActivateTool(ToolKind::Select));
    canvas.execute(Command::ActivateTool(ToolKind::Line));
    assert!(canvas.tools().is_idle());

    // The old start point is gone: one click does not commit.
    click(&mut canvas, 10.0, 0.0);
    assert_eq!(canvas.document().len(), 1);
}

#[test]
fn test_undo_redo_restores_exact_documents() {
    let mut canvas = canvas();
    let empty = canvas.document().clone();
    canvas.execute(Command::ActivateTool(ToolKind::Line));
    click(&mut canvas, 0.0, 0.0);
    click(&mut canvas, 10.0, 0.0);
    let one = canvas.document().clone();
    click(&mut canvas, 10.0, 5.0);
    let two = canvas.document().clone();

    let ctrl = |c: char| KeyInput::new(Key::Char(c)).with_modifiers(linework_core::Modifiers::CTRL);
    canvas.key_down(ctrl('z'));
    assert_eq!(canvas.document(), &one);
    canvas.key_down(ctrl('z'));
    assert_eq!(canvas.document(), &empty);
    canvas.key_down(ctrl('y'));
    assert_eq!(canvas.document(), &one);
    canvas.key_down(ctrl('y'));
    assert_eq!(canvas.document(), &two);
}

#[test]
fn test_select_then_delete_with_key() {
    let mut canvas = canvas();
    let (a, b) = canvas.update(|editor| {
        let a = editor
            .commit_geometry(Geometry::line(Point::ZERO, Point::new(10.0, 0.0)))
            .unwrap();
        let b = editor
            .commit_geometry(Geometry::circle(Point::new(40.0, 0.0), 5.0))
            .unwrap();
        (a, b)
    });

    click(&mut canvas, 5.0, 1.0);
    assert_eq!(canvas.editor().selection().to_vec(), vec![a]);
    canvas.pointer_down(PointerInput::at(45.0, 0.0).shift());
    assert!(canvas.editor().selection().contains(b));

    type_keys(&mut canvas, &[Key::Delete]);
    assert!(canvas.document().is_empty());
    assert!(canvas.editor().selection().is_empty());

    canvas.execute(Command::Undo);
    assert_eq!(canvas.document().len(), 2);
}

#[test]
fn test_space_repeats_last_command() {
    let mut canvas = canvas();
    type_keys(&mut canvas, &[Key::Char('c'), Key::Space]);
    click(&mut canvas, 0.0, 0.0);
    click(&mut canvas, 3.0, 0.0);
    assert_eq!(canvas.editor().last_command(), Some(ToolKind::Circle));

    type_keys(&mut canvas, &[Key::Escape]);
    assert_eq!(canvas.tools().active_kind(), Some(ToolKind::Select));
    assert_eq!(canvas.editor().last_command(), None);

    type_keys(&mut canvas, &[Key::Char('r'), Key::Space, Key::Escape]);
    canvas.update(|editor| editor.set_last_command(Some(ToolKind::Rectangle)));
    type_keys(&mut canvas, &[Key::Space]);
    assert_eq!(canvas.tools().active_kind(), Some(ToolKind::Rectangle));
}

#[test]
fn test_ortho_and_snap_toggles() {
    let mut canvas = canvas();
    type_keys(&mut canvas, &[Key::Function(8)]);
    assert!(canvas.editor().settings().ortho);

    canvas.execute(Command::ActivateTool(ToolKind::Line));
    click(&mut canvas, 0.0, 0.0);
    click(&mut canvas, 10.0, 2.0);
    type_keys(&mut canvas, &[Key::Enter]);
    assert_eq!(
        geometries(canvas.document()),
        vec![Geometry::line(Point::ZERO, Point::new(10.0, 0.0))]
    );

    // With object snap on, a click near the end point lands on it.
    type_keys(&mut canvas, &[Key::Function(3)]);
    assert!(canvas.editor().settings().osnap);
    click(&mut canvas, 30.0, 30.0);
    click(&mut canvas, 11.0, 1.0);
    let snapped = geometries(canvas.document())
        .into_iter()
        .any(|g| g == Geometry::line(Point::new(30.0, 30.0), Point::new(10.0, 0.0)));
    assert!(snapped);
}

#[test]
fn test_layers_through_the_editor() {
    let mut canvas = canvas();
    let layer_id = canvas.update(|editor| editor.create_layer()).unwrap();
    canvas.execute(Command::ActivateTool(ToolKind::Rectangle));
    click(&mut canvas, 0.0, 0.0);
    click(&mut canvas, 4.0, 3.0);
    let entity_id = canvas.document().entities().next().unwrap().id();
    assert_eq!(canvas.document().entity(entity_id).unwrap().layer_id, layer_id);

    canvas
        .update(|editor| editor.update_layer(&layer_id, LayerPatch::line_style(LineStyle::Dashed)))
        .unwrap();
    let item = canvas.scene().item(entity_id).unwrap();
    assert_eq!(item.stroke.dash.as_deref(), Some(&[10.0, 4.0][..]));

    canvas
        .update(|editor| editor.update_layer(&layer_id, LayerPatch::visible(false)))
        .unwrap();
    assert!(canvas.scene().is_empty());

    assert!(canvas.update(|editor| editor.delete_layer(&layer_id)));
    let entity = canvas.document().entity(entity_id).unwrap();
    assert_eq!(entity.layer_id, DEFAULT_LAYER_ID);
    assert_eq!(canvas.document().active_layer_id(), DEFAULT_LAYER_ID);
    assert_eq!(canvas.scene().len(), 1);

    assert!(!canvas.update(|editor| editor.delete_layer(DEFAULT_LAYER_ID)));
}

#[test]
fn test_moving_entity_between_layers() {
    let mut canvas = canvas();
    canvas
        .update(|editor| editor.add_layer(Layer::new("walls", "Walls")))
        .unwrap();
    let entity = Entity::new(DEFAULT_LAYER_ID, Geometry::circle(Point::ZERO, 1.0));
    let id = canvas.update(|editor| editor.add_entity(entity)).unwrap();
    let moved = canvas
        .update(|editor| editor.update_entity(id, EntityPatch::layer("walls")))
        .unwrap();
    assert!(moved);
    assert_eq!(canvas.document().entity(id).unwrap().layer_id, "walls");
    assert!(
        canvas
            .update(|editor| editor.update_entity(id, EntityPatch::layer("ghost")))
            .is_err()
    );
    assert_eq!(canvas.document().entity(id).unwrap().layer_id, "walls");
}

#[test]
fn test_events_report_changes() {
    let mut canvas = canvas();
    canvas.poll_events();
    canvas.execute(Command::ActivateTool(ToolKind::Line));
    let events = canvas.poll_events();
    assert!(events.contains(&EditorEvent::ToolChanged(ToolKind::Line)));
    assert!(events.contains(&EditorEvent::LastCommandChanged));

    click(&mut canvas, 0.0, 0.0);
    assert!(canvas.poll_events().is_empty());
    click(&mut canvas, 1.0, 0.0);
    assert_eq!(canvas.poll_events(), vec![EditorEvent::DocumentChanged]);
}

#[test]
fn test_pointer_gesture_drops_pending_key_sequence() {
    let mut canvas = canvas();
    canvas.update(|editor| editor.set_last_command(Some(ToolKind::Line)));

    // "a" waits for space to complete "a space".
    type_keys(&mut canvas, &[Key::Char('a')]);
    canvas.pointer_down(PointerInput::at(-10.0, -10.0));
    canvas.pointer_move(PointerInput::at(10.0, 10.0));
    canvas.pointer_up(PointerInput::at(10.0, 10.0));

    let ran = canvas.key_down(KeyInput::new(Key::Space));
    assert_eq!(ran, Some(Command::RepeatLastCommand));
    assert_eq!(canvas.tools().active_kind(), Some(ToolKind::Line));
    assert_eq!(canvas.editor().last_command(), Some(ToolKind::Line));
}

#[test]
fn test_load_rejects_mis_keyed_entities() {
    let mut canvas = canvas();
    let mut source = Document::new();
    let entity = Entity::new(DEFAULT_LAYER_ID, Geometry::circle(Point::ZERO, 2.0));
    let id = entity.id();
    source.add_entity(entity).unwrap();

    let mut value = serde_json::to_value(&source).unwrap();
    let entities = value["entities"].as_object_mut().unwrap();
    let stored = entities.remove(&id.to_string()).unwrap();
    entities.insert(uuid::Uuid::new_v4().to_string(), stored);
    let rekeyed: Document = serde_json::from_value(value).unwrap();

    assert!(canvas.load_document(rekeyed).is_err());
    assert!(canvas.document().is_empty());
    assert!(canvas.load_document(source).is_ok());
    assert_eq!(canvas.document().len(), 1);
}
