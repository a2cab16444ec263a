//! Snapshot-based undo/redo around the document.

use crate::document::Document;

/// Default maximum number of undo states to keep.
pub const DEFAULT_UNDO_LIMIT: usize = 50;

/// Owns the live [`Document`] and its undo/redo snapshots.
///
/// All document mutations go through [`History::apply`], which records the
/// pre-mutation state whenever the document actually changes. Editor state
/// such as the selection or the active tool never lives here.
#[derive(Debug, Clone)]
pub struct History {
    present: Document,
    past: Vec<Document>,
    future: Vec<Document>,
    limit: usize,
    revision: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

impl History {
    /// Wrap a document with the default undo limit.
    pub fn new(document: Document) -> Self {
        Self::with_limit(document, DEFAULT_UNDO_LIMIT)
    }

    /// Wrap a document keeping at most `limit` undo states (at least one).
    pub fn with_limit(document: Document, limit: usize) -> Self {
        Self {
            present: document,
            past: Vec::new(),
            future: Vec::new(),
            limit: limit.max(1),
            revision: 0,
        }
    }

    /// The current document.
    pub fn document(&self) -> &Document {
        &self.present
    }

    /// Incremented every time the current document changes, including undo
    /// and redo.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Run a mutation as one undoable step.
    ///
    /// On error the document is restored to its previous state and nothing
    /// is recorded. A mutation that leaves the document unchanged is not
    /// recorded either.
    pub fn apply<T, E>(
        &mut self,
        mutation: impl FnOnce(&mut Document) -> Result<T, E>,
    ) -> Result<T, E> {
        let snapshot = self.present.clone();
        match mutation(&mut self.present) {
            Ok(value) => {
                if self.present != snapshot {
                    self.record(snapshot);
                }
                Ok(value)
            }
            Err(err) => {
                self.present = snapshot;
                Err(err)
            }
        }
    }

    fn record(&mut self, snapshot: Document) {
        self.past.push(snapshot);

        // Clear redo stack when new changes are made
        self.future.clear();

        if self.past.len() > self.limit {
            self.past.remove(0);
        }
        self.revision += 1;
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, snapshot);
        self.future.push(current);
        self.revision += 1;
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, snapshot);
        self.past.push(current);
        self.revision += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Replace the document and forget all history.
    pub fn reset(&mut self, document: Document) {
        self.present = document;
        self.past.clear();
        self.future.clear();
        self.revision += 1;
    }
}
