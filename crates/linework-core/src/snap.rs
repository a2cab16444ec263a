//! Placement aids: ortho constraint and object snapping.

use crate::document::Document;
use crate::entity::{EntityId, Geometry};
use crate::scene::circumcircle;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Object snap kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapMode {
    Endpoint,
    Midpoint,
    Center,
}

impl SnapMode {
    pub const ALL: [SnapMode; 3] = [SnapMode::Endpoint, SnapMode::Midpoint, SnapMode::Center];
}

/// Which object snap kinds are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapModes {
    pub endpoint: bool,
    pub midpoint: bool,
    pub center: bool,
}

impl Default for SnapModes {
    fn default() -> Self {
        Self {
            endpoint: true,
            midpoint: true,
            center: true,
        }
    }
}

impl SnapModes {
    pub fn contains(&self, mode: SnapMode) -> bool {
        match mode {
            SnapMode::Endpoint => self.endpoint,
            SnapMode::Midpoint => self.midpoint,
            SnapMode::Center => self.center,
        }
    }

    pub fn set(&mut self, mode: SnapMode, enabled: bool) {
        match mode {
            SnapMode::Endpoint => self.endpoint = enabled,
            SnapMode::Midpoint => self.midpoint = enabled,
            SnapMode::Center => self.center = enabled,
        }
    }

    pub fn any(&self) -> bool {
        SnapMode::ALL.iter().any(|&mode| self.contains(mode))
    }
}

/// A point on an entity that placement can snap to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub point: Point,
    pub mode: SnapMode,
    pub entity_id: EntityId,
}

/// Constrain `raw` to the horizontal or vertical through `reference`.
///
/// The axis with the larger delta stays free; ties keep x locked.
pub fn ortho_point(reference: Point, raw: Point) -> Point {
    let dx = (raw.x - reference.x).abs();
    let dy = (raw.y - reference.y).abs();
    if dx > dy {
        Point::new(raw.x, reference.y)
    } else {
        Point::new(reference.x, raw.y)
    }
}

/// Snap targets of a single piece of geometry.
pub fn geometry_targets(entity_id: EntityId, geometry: &Geometry) -> Vec<SnapTarget> {
    let target = |point, mode| SnapTarget {
        point,
        mode,
        entity_id,
    };
    match geometry {
        Geometry::Line { start, end } => vec![
            target(*start, SnapMode::Endpoint),
            target(*end, SnapMode::Endpoint),
            target(start.midpoint(*end), SnapMode::Midpoint),
        ],
        Geometry::Circle { center, .. } => vec![target(*center, SnapMode::Center)],
        Geometry::Arc { start, through, end } => {
            let mut targets = vec![
                target(*start, SnapMode::Endpoint),
                target(*end, SnapMode::Endpoint),
            ];
            if let Some(circle) = circumcircle(*start, *through, *end) {
                targets.push(target(circle.center, SnapMode::Center));
            }
            targets
        }
        Geometry::Polyline { points, closed } => {
            let mut targets: Vec<SnapTarget> = points
                .iter()
                .map(|p| target(*p, SnapMode::Endpoint))
                .collect();
            targets.extend(
                points
                    .windows(2)
                    .map(|w| target(w[0].midpoint(w[1]), SnapMode::Midpoint)),
            );
            if *closed {
                if let (Some(first), Some(last)) = (points.first(), points.last()) {
                    targets.push(target(last.midpoint(*first), SnapMode::Midpoint));
                }
            }
            targets
        }
    }
}

/// Snap targets of every entity on a visible layer, filtered by `modes`.
pub fn snap_targets(document: &Document, modes: &SnapModes) -> Vec<SnapTarget> {
    document
        .entities()
        .filter(|entity| {
            document
                .layer(&entity.layer_id)
                .is_some_and(|layer| layer.visible)
        })
        .flat_map(|entity| geometry_targets(entity.id(), &entity.geometry))
        .filter(|target| modes.contains(target.mode))
        .collect()
}

/// The target closest to `point`, strictly within `tolerance`.
pub fn nearest_snap(point: Point, targets: &[SnapTarget], tolerance: f64) -> Option<SnapTarget> {
    let mut best: Option<SnapTarget> = None;
    let mut best_dist_sq = tolerance * tolerance;

    for target in targets {
        let dist_sq = (point - target.point).hypot2();
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(*target);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::layer::Layer;

    #[test]
    fn test_ortho_horizontal() {
        let p = ortho_point(Point::new(0.0, 0.0), Point::new(10.0, 3.0));
        assert_eq!(p, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_ortho_vertical() {
        let p = ortho_point(Point::new(0.0, 0.0), Point::new(-2.0, -8.0));
        assert_eq!(p, Point::new(0.0, -8.0));
    }

    #[test]
    fn test_ortho_tie_locks_x() {
        let p = ortho_point(Point::new(1.0, 1.0), Point::new(4.0, 4.0));
        assert_eq!(p, Point::new(1.0, 4.0));
    }

    #[test]
    fn test_line_targets() {
        let id = uuid::Uuid::new_v4();
        let targets = geometry_targets(id, &Geometry::line(Point::ZERO, Point::new(10.0, 0.0)));
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[2].point, Point::new(5.0, 0.0));
        assert_eq!(targets[2].mode, SnapMode::Midpoint);
    }

    #[test]
    fn test_closed_polyline_has_closing_midpoint() {
        let id = uuid::Uuid::new_v4();
        let square = Geometry::polyline(
            vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
                Point::new(0.0, 4.0),
            ],
            true,
        );
        let midpoints: Vec<Point> = geometry_targets(id, &square)
            .into_iter()
            .filter(|t| t.mode == SnapMode::Midpoint)
            .map(|t| t.point)
            .collect();
        assert_eq!(midpoints.len(), 4);
        assert!(midpoints.contains(&Point::new(0.0, 2.0)));
    }

    #[test]
    fn test_snap_targets_respect_modes_and_visibility() {
        let mut doc = Document::new();
        let mut hidden = Layer::new("hidden", "Hidden");
        hidden.visible = false;
        doc.add_layer(hidden).unwrap();
        doc.add_entity(Entity::new("0", Geometry::circle(Point::new(3.0, 3.0), 1.0)))
            .unwrap();
        doc.add_entity(Entity::new("hidden", Geometry::circle(Point::ZERO, 1.0)))
            .unwrap();

        let targets = snap_targets(&doc, &SnapModes::default());
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].point, Point::new(3.0, 3.0));

        let mut modes = SnapModes::default();
        modes.set(SnapMode::Center, false);
        assert!(snap_targets(&doc, &modes).is_empty());
    }

    #[test]
    fn test_snap_modes_set_and_any() {
        let mut modes = SnapModes::default();
        for mode in SnapMode::ALL {
            assert!(modes.contains(mode));
            modes.set(mode, false);
            assert!(!modes.contains(mode));
        }
        assert!(!modes.any());
        modes.set(SnapMode::Midpoint, true);
        assert!(modes.any());
    }

    #[test]
    fn test_nearest_snap() {
        let id = uuid::Uuid::new_v4();
        let targets = geometry_targets(id, &Geometry::line(Point::ZERO, Point::new(10.0, 0.0)));

        let hit = nearest_snap(Point::new(9.0, 1.0), &targets, 4.0).unwrap();
        assert_eq!(hit.point, Point::new(10.0, 0.0));
        assert!(nearest_snap(Point::new(10.0, 5.0), &targets, 4.0).is_none());
        // Tolerance is exclusive.
        assert!(nearest_snap(Point::new(14.0, 0.0), &targets, 4.0).is_none());
    }
}
