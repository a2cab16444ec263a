//! The drawing document: entities, layers and the active layer.

use crate::entity::{Entity, EntityId, EntityPatch};
use crate::error::{DocumentError, DocumentResult};
use crate::layer::{DEFAULT_LAYER_ID, Layer, LayerId, LayerPatch};
use crate::scene::geometry_path;
use kurbo::{Rect, Shape as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The undoable part of the application state.
///
/// Every mutation validates before it touches anything, so a failed call
/// leaves the document exactly as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    entities: HashMap<EntityId, Entity>,
    layers: HashMap<LayerId, Layer>,
    active_layer_id: LayerId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the default layer.
    pub fn new() -> Self {
        let default_layer = Layer::default_layer();
        let mut layers = HashMap::new();
        layers.insert(default_layer.id.clone(), default_layer);
        Self {
            entities: HashMap::new(),
            layers,
            active_layer_id: DEFAULT_LAYER_ID.to_string(),
        }
    }

    /// Add an entity.
    pub fn add_entity(&mut self, entity: Entity) -> DocumentResult<()> {
        if self.entities.contains_key(&entity.id()) {
            return Err(DocumentError::DuplicateEntity(entity.id()));
        }
        if !self.layers.contains_key(&entity.layer_id) {
            return Err(DocumentError::UnknownLayer(entity.layer_id.clone()));
        }
        entity.geometry.validate()?;
        self.entities.insert(entity.id(), entity);
        Ok(())
    }

    /// Merge a patch into an entity.
    ///
    /// Returns `Ok(false)` when the entity does not exist.
    pub fn update_entity(&mut self, id: EntityId, patch: EntityPatch) -> DocumentResult<bool> {
        let Some(entity) = self.entities.get(&id) else {
            return Ok(false);
        };
        if let Some(layer_id) = &patch.layer_id {
            if !self.layers.contains_key(layer_id) {
                return Err(DocumentError::UnknownLayer(layer_id.clone()));
            }
        }
        if let Some(geometry) = &patch.geometry {
            if geometry.kind() != entity.kind() {
                return Err(DocumentError::GeometryKindMismatch {
                    from: entity.kind(),
                    to: geometry.kind(),
                });
            }
            geometry.validate()?;
        }

        let Some(entity) = self.entities.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(layer_id) = patch.layer_id {
            entity.layer_id = layer_id;
        }
        if let Some(geometry) = patch.geometry {
            entity.geometry = geometry;
        }
        Ok(true)
    }

    /// Remove entities. Missing ids are ignored.
    ///
    /// Returns the ids that were actually removed.
    pub fn delete_entities(&mut self, ids: &[EntityId]) -> Vec<EntityId> {
        ids.iter()
            .filter(|id| self.entities.remove(*id).is_some())
            .copied()
            .collect()
    }

    /// Add a layer.
    pub fn add_layer(&mut self, layer: Layer) -> DocumentResult<()> {
        if self.layers.contains_key(&layer.id) {
            return Err(DocumentError::DuplicateLayer(layer.id));
        }
        if !Layer::weight_is_valid(layer.line_weight) {
            return Err(DocumentError::InvalidLayer("line weight must be positive"));
        }
        self.layers.insert(layer.id.clone(), layer);
        Ok(())
    }

    /// Merge a patch into a layer.
    ///
    /// Returns `Ok(false)` when the layer does not exist.
    pub fn update_layer(&mut self, id: &str, patch: LayerPatch) -> DocumentResult<bool> {
        if let Some(weight) = patch.line_weight {
            if !Layer::weight_is_valid(weight) {
                return Err(DocumentError::InvalidLayer("line weight must be positive"));
            }
        }
        match self.layers.get_mut(id) {
            Some(layer) => {
                layer.apply(patch);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete a layer, moving its entities to the default layer.
    ///
    /// The default layer can never be deleted. Returns whether a layer was
    /// removed.
    pub fn delete_layer(&mut self, id: &str) -> bool {
        if id == DEFAULT_LAYER_ID || self.layers.remove(id).is_none() {
            return false;
        }
        for entity in self.entities.values_mut() {
            if entity.layer_id == id {
                entity.layer_id = DEFAULT_LAYER_ID.to_string();
            }
        }
        if self.active_layer_id == id {
            self.active_layer_id = DEFAULT_LAYER_ID.to_string();
        }
        true
    }

    /// Make a layer the target for new entities.
    pub fn set_active_layer(&mut self, id: &str) -> DocumentResult<()> {
        if !self.layers.contains_key(id) {
            return Err(DocumentError::UnknownLayer(id.to_string()));
        }
        self.active_layer_id = id.to_string();
        Ok(())
    }

    /// Get an entity by id.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// All entities, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Get a layer by id.
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.get(id)
    }

    /// Layers in display order: the default layer first, then by name.
    pub fn layers(&self) -> Vec<&Layer> {
        let mut layers: Vec<&Layer> = self.layers.values().collect();
        layers.sort_by(|a, b| {
            b.is_default()
                .cmp(&a.is_default())
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn active_layer_id(&self) -> &str {
        &self.active_layer_id
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.layers.get(&self.active_layer_id)
    }

    /// Entities that sit on the given layer.
    pub fn entities_on_layer<'a>(&'a self, layer_id: &'a str) -> impl Iterator<Item = &'a Entity> {
        self.entities.values().filter(move |e| e.layer_id == layer_id)
    }

    /// Check if the document has no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get the number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Get the bounding box of all entities.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for entity in self.entities.values() {
            let bounds = geometry_path(&entity.geometry).bounding_box();
            result = Some(match result {
                Some(r) => r.union(bounds),
                None => bounds,
            });
        }
        result
    }

    /// Verify the structural invariants. Used by tests and debug assertions.
    pub fn check_invariants(&self) -> DocumentResult<()> {
        if !self.layers.contains_key(DEFAULT_LAYER_ID) {
            return Err(DocumentError::UnknownLayer(DEFAULT_LAYER_ID.to_string()));
        }
        if !self.layers.contains_key(&self.active_layer_id) {
            return Err(DocumentError::UnknownLayer(self.active_layer_id.clone()));
        }
        for (key, layer) in &self.layers {
            if *key != layer.id {
                return Err(DocumentError::LayerKeyMismatch {
                    key: key.clone(),
                    id: layer.id.clone(),
                });
            }
        }
        for (key, entity) in &self.entities {
            if *key != entity.id() {
                return Err(DocumentError::EntityKeyMismatch {
                    key: *key,
                    id: entity.id(),
                });
            }
            if !self.layers.contains_key(&entity.layer_id) {
                return Err(DocumentError::UnknownLayer(entity.layer_id.clone()));
            }
            entity.geometry.validate()?;
        }
        Ok(())
    }
}
