//! Entity definitions for the drawing.

use crate::error::DocumentError;
use crate::layer::LayerId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for entities.
pub type EntityId = Uuid;

/// Variant name of a piece of geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Line,
    Circle,
    Arc,
    Polyline,
}

impl GeometryKind {
    pub fn name(self) -> &'static str {
        match self {
            GeometryKind::Line => "line",
            GeometryKind::Circle => "circle",
            GeometryKind::Arc => "arc",
            GeometryKind::Polyline => "polyline",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Geometric payload of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    /// Straight segment.
    Line { start: Point, end: Point },
    /// Full circle. Radius is strictly positive.
    Circle { center: Point, radius: f64 },
    /// Circular arc from `start` to `end` passing through `through`.
    Arc { start: Point, through: Point, end: Point },
    /// Connected segments through at least two points.
    Polyline { points: Vec<Point>, closed: bool },
}

impl Geometry {
    /// Create a line.
    pub fn line(start: Point, end: Point) -> Self {
        Geometry::Line { start, end }
    }

    /// Create a circle.
    pub fn circle(center: Point, radius: f64) -> Self {
        Geometry::Circle { center, radius }
    }

    /// Create a three-point arc.
    pub fn arc(start: Point, through: Point, end: Point) -> Self {
        Geometry::Arc { start, through, end }
    }

    /// Create a polyline.
    pub fn polyline(points: Vec<Point>, closed: bool) -> Self {
        Geometry::Polyline { points, closed }
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Line { .. } => GeometryKind::Line,
            Geometry::Circle { .. } => GeometryKind::Circle,
            Geometry::Arc { .. } => GeometryKind::Arc,
            Geometry::Polyline { .. } => GeometryKind::Polyline,
        }
    }

    /// Check the per-variant invariants.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
        match self {
            Geometry::Line { start, end } => {
                if !finite(start) || !finite(end) {
                    return Err(DocumentError::InvalidGeometry("line has a non-finite point"));
                }
            }
            Geometry::Circle { center, radius } => {
                if !finite(center) {
                    return Err(DocumentError::InvalidGeometry("circle center is not finite"));
                }
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(DocumentError::InvalidGeometry("circle radius must be positive"));
                }
            }
            Geometry::Arc { start, through, end } => {
                if ![*start, *through, *end].iter().all(finite) {
                    return Err(DocumentError::InvalidGeometry("arc has a non-finite point"));
                }
            }
            Geometry::Polyline { points, .. } => {
                if points.len() < 2 {
                    return Err(DocumentError::InvalidGeometry(
                        "polyline needs at least two points",
                    ));
                }
                if !points.iter().all(finite) {
                    return Err(DocumentError::InvalidGeometry("polyline has a non-finite point"));
                }
            }
        }
        Ok(())
    }

    /// Defining points of the geometry (vertices, endpoints, centers).
    pub fn points(&self) -> Vec<Point> {
        match self {
            Geometry::Line { start, end } => vec![*start, *end],
            Geometry::Circle { center, .. } => vec![*center],
            Geometry::Arc { start, through, end } => vec![*start, *through, *end],
            Geometry::Polyline { points, .. } => points.clone(),
        }
    }
}

/// A persisted drawable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    id: EntityId,
    /// Layer the entity belongs to.
    pub layer_id: LayerId,
    /// Geometry of the entity.
    #[serde(flatten)]
    pub geometry: Geometry,
}

impl Entity {
    /// Create an entity with a fresh id.
    pub fn new(layer_id: impl Into<LayerId>, geometry: Geometry) -> Self {
        Self::with_id(Uuid::new_v4(), layer_id, geometry)
    }

    /// Create an entity with a known id.
    pub fn with_id(id: EntityId, layer_id: impl Into<LayerId>, geometry: Geometry) -> Self {
        Self {
            id,
            layer_id: layer_id.into(),
            geometry,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }
}

/// Partial update for an entity. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPatch {
    pub layer_id: Option<LayerId>,
    /// Replacement geometry; must be of the same kind as the current one.
    pub geometry: Option<Geometry>,
}

impl EntityPatch {
    pub fn layer(layer_id: impl Into<LayerId>) -> Self {
        Self {
            layer_id: Some(layer_id.into()),
            geometry: None,
        }
    }

    pub fn geometry(geometry: Geometry) -> Self {
        Self {
            layer_id: None,
            geometry: Some(geometry),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layer_id.is_none() && self.geometry.is_none()
    }
}
