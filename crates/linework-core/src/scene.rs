//! Render sync: the styled, id-tagged scene the renderer draws and the
//! select tool hit-tests.

use crate::document::Document;
use crate::entity::{EntityId, Geometry};
use kurbo::{Arc, BezPath, Circle, ParamCurveNearest, Point, Rect, Shape as _, Vec2};
use peniko::Color;
use std::f64::consts::TAU;

/// Tolerance used when flattening curves into paths.
pub const PATH_TOLERANCE: f64 = 0.01;

/// Dash pattern of preview geometry.
pub const PREVIEW_DASH: [f64; 2] = [4.0, 4.0];

/// Stroke parameters of a rendered item.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    /// Dash pattern, present only for dashed layers.
    pub dash: Option<Vec<f64>>,
}

/// One entity as the renderer should draw it.
#[derive(Debug, Clone)]
pub struct SceneItem {
    pub entity_id: EntityId,
    pub path: BezPath,
    pub stroke: StrokeStyle,
    /// Entity sits on a locked layer and cannot be picked.
    pub locked: bool,
    bounds: Rect,
}

impl SceneItem {
    /// Geometric bounds (stroke width excluded).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Distance from a point to the item's outline.
    pub fn distance_to(&self, point: Point) -> f64 {
        self.path
            .segments()
            .map(|seg| seg.nearest(point, 1e-9).distance_sq)
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }
}

/// Snapshot of every visible entity, rebuilt from the document.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    items: Vec<SceneItem>,
}

impl Scene {
    /// Build the scene for a document. Entities on hidden layers are left out.
    pub fn build(document: &Document) -> Self {
        let mut items: Vec<SceneItem> = document
            .entities()
            .filter_map(|entity| {
                let layer = document.layer(&entity.layer_id)?;
                if !layer.visible {
                    return None;
                }
                let path = geometry_path(&entity.geometry);
                let bounds = path.bounding_box();
                Some(SceneItem {
                    entity_id: entity.id(),
                    path,
                    stroke: StrokeStyle {
                        color: layer.color.into(),
                        width: layer.line_weight,
                        dash: layer.line_style.dash_pattern().map(<[f64]>::to_vec),
                    },
                    locked: layer.locked,
                    bounds,
                })
            })
            .collect();
        items.sort_by_key(|item| item.entity_id);
        Self { items }
    }

    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn item(&self, id: EntityId) -> Option<&SceneItem> {
        self.items.iter().find(|item| item.entity_id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the pickable entity whose stroke is nearest to `point`, within
    /// `tolerance` plus half the stroke width.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<EntityId> {
        self.items
            .iter()
            .filter(|item| !item.locked)
            .filter(|item| {
                let reach = reach(item, tolerance);
                item.bounds.inflate(reach, reach).contains(point)
            })
            .map(|item| (item.distance_to(point), item))
            .filter(|(distance, item)| *distance <= reach(item, tolerance))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, item)| item.entity_id)
    }

    /// Ids of pickable entities whose bounds lie entirely inside `rect`.
    pub fn ids_inside(&self, rect: Rect) -> Vec<EntityId> {
        let rect = rect.abs();
        self.items
            .iter()
            .filter(|item| !item.locked && rect_contains(rect, item.bounds))
            .map(|item| item.entity_id)
            .collect()
    }
}

fn reach(item: &SceneItem, tolerance: f64) -> f64 {
    tolerance + item.stroke.width / 2.0
}

fn rect_contains(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// The circle through three points, if they are not collinear.
pub fn circumcircle(a: Point, b: Point, c: Point) -> Option<Circle> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-9 {
        return None;
    }
    let (a2, b2, c2) = (a.to_vec2().hypot2(), b.to_vec2().hypot2(), c.to_vec2().hypot2());
    let center = Point::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    );
    Some(Circle::new(center, center.distance(a)))
}

/// The circular arc from `start` to `end` that passes through `through`.
pub fn arc_through(start: Point, through: Point, end: Point) -> Option<Arc> {
    let circle = circumcircle(start, through, end)?;
    let angle = |p: Point| (p - circle.center).atan2();
    let start_angle = angle(start);
    let to_end = (angle(end) - start_angle).rem_euclid(TAU);
    let to_through = (angle(through) - start_angle).rem_euclid(TAU);
    let sweep_angle = if to_through < to_end {
        to_end
    } else {
        to_end - TAU
    };
    Some(Arc::new(
        circle.center,
        Vec2::new(circle.radius, circle.radius),
        start_angle,
        sweep_angle,
        0.0,
    ))
}

/// Outline of a piece of geometry.
pub fn geometry_path(geometry: &Geometry) -> BezPath {
    match geometry {
        Geometry::Line { start, end } => polyline_path(&[*start, *end], false),
        Geometry::Circle { center, radius } => Circle::new(*center, *radius).to_path(PATH_TOLERANCE),
        Geometry::Arc { start, through, end } => match arc_through(*start, *through, *end) {
            Some(arc) => arc.to_path(PATH_TOLERANCE),
            // Collinear points degrade to straight segments.
            None => polyline_path(&[*start, *through, *end], false),
        },
        Geometry::Polyline { points, closed } => polyline_path(points, *closed),
    }
}

fn polyline_path(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for point in iter {
            path.line_to(*point);
        }
        if closed {
            path.close_path();
        }
    }
    path
}

/// Ephemeral geometry shown while a gesture is in progress.
///
/// Previews are owned by the tool that produced them and never enter the
/// document.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Line { from: Point, to: Point },
    Circle { center: Point, radius: f64 },
    Arc { start: Point, through: Point, end: Point },
    Polyline { points: Vec<Point>, closed: bool },
    /// Rubber-band selection box.
    SelectionBox(Rect),
}

/// A preview ready to draw.
#[derive(Debug, Clone)]
pub struct PreviewItem {
    pub path: BezPath,
    pub stroke: StrokeStyle,
    pub fill: Option<Color>,
}

impl Preview {
    pub fn to_path(&self) -> BezPath {
        match self {
            Preview::Line { from, to } => polyline_path(&[*from, *to], false),
            Preview::Circle { center, radius } => {
                Circle::new(*center, radius.max(0.0)).to_path(PATH_TOLERANCE)
            }
            Preview::Arc { start, through, end } => {
                geometry_path(&Geometry::arc(*start, *through, *end))
            }
            Preview::Polyline { points, closed } => polyline_path(points, *closed),
            Preview::SelectionBox(rect) => rect.abs().to_path(PATH_TOLERANCE),
        }
    }

    /// Styled preview: red dashed outlines, blue translucent selection box.
    pub fn to_item(&self) -> PreviewItem {
        let (color, fill) = match self {
            Preview::SelectionBox(_) => (
                Color::from_rgba8(0, 0, 255, 255),
                Some(Color::from_rgba8(0, 128, 255, 51)),
            ),
            _ => (Color::from_rgba8(255, 0, 0, 255), None),
        };
        PreviewItem {
            path: self.to_path(),
            stroke: StrokeStyle {
                color,
                width: 1.0,
                dash: Some(PREVIEW_DASH.to_vec()),
            },
            fill,
        }
    }
}
