//! Errors raised by document mutations.

use crate::entity::{EntityId, GeometryKind};
use crate::layer::LayerId;
use thiserror::Error;

/// Document validation errors.
///
/// Missing ids are not errors: updates and deletes of absent entities or
/// layers are silent no-ops.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("Entity already exists: {0}")]
    DuplicateEntity(EntityId),
    #[error("Layer already exists: {0}")]
    DuplicateLayer(LayerId),
    #[error("Unknown layer: {0}")]
    UnknownLayer(LayerId),
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(&'static str),
    #[error("Invalid layer: {0}")]
    InvalidLayer(&'static str),
    #[error("Cannot change a {from} into a {to}")]
    GeometryKindMismatch { from: GeometryKind, to: GeometryKind },
    #[error("Entity {id} is stored under key {key}")]
    EntityKeyMismatch { key: EntityId, id: EntityId },
    #[error("Layer {id} is stored under key {key}")]
    LayerKeyMismatch { key: LayerId, id: LayerId },
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
