//! Scene object arena with graph topology.

use log::trace;

use crate::error::{ReconcileError, Result};
use crate::foundation::collections::{ObjectId, SlotMap};

use super::scene_object::SceneObject;
use super::value::Value;

/// Arena holding every live scene object
///
/// Objects are addressed by [`ObjectId`] handles. Disposed objects leave the
/// arena and their handles fail lookups from then on, so deferred work that
/// still holds an id is harmless.
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: SlotMap<ObjectId, SceneObject>,
    disposed: usize,
}

impl ObjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Allocation API --

    /// Moves an object into the store and returns its handle.
    pub fn insert(&mut self, object: SceneObject) -> ObjectId {
        let class = object.class().to_owned();
        let id = self.objects.insert(object);
        trace!("Inserted {class} as {id:?}");
        id
    }

    /// Disposes an object, releasing it from the store.
    ///
    /// The object is unlinked from its graph parent, and any graph children
    /// still attached to it become roots. Returns `false` when the object was
    /// already gone.
    pub fn dispose(&mut self, id: ObjectId) -> bool {
        let Some(object) = self.objects.remove(id) else {
            return false;
        };
        if let Some(parent) = object.parent.and_then(|p| self.objects.get_mut(p)) {
            parent.children.retain(|&c| c != id);
        }
        for child in &object.children {
            if let Some(child) = self.objects.get_mut(*child) {
                child.parent = None;
            }
        }
        self.disposed += 1;
        trace!("Disposed {} {id:?}", object.class());
        true
    }

    /// Total number of objects disposed through this store.
    pub fn disposed_count(&self) -> usize {
        self.disposed
    }

    /// Returns whether the handle refers to a live object.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Looks up an object.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Looks up an object, failing on a stale handle.
    pub fn object(&self, id: ObjectId) -> Result<&SceneObject> {
        self.objects.get(id).ok_or(ReconcileError::UnknownObject(id))
    }

    /// Looks up an object mutably, failing on a stale handle.
    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject> {
        self.objects
            .get_mut(id)
            .ok_or(ReconcileError::UnknownObject(id))
    }

    // -- Field API --

    /// Reads a field of an object.
    pub fn field(&self, id: ObjectId, name: &str) -> Result<Value> {
        Ok(self.object(id)?.field(name))
    }

    /// Assigns a field of an object, returning the previous value.
    pub fn set_field(&mut self, id: ObjectId, name: &str, value: Value) -> Result<Value> {
        Ok(self.object_mut(id)?.set_field(name, value))
    }

    // -- Topology API --

    /// Returns the graph parent of an object.
    pub fn parent(&self, id: ObjectId) -> Result<Option<ObjectId>> {
        Ok(self.object(id)?.parent)
    }

    /// Returns the graph children of an object.
    pub fn children(&self, id: ObjectId) -> Result<&[ObjectId]> {
        Ok(self.object(id)?.children())
    }

    /// Position of `child` in the graph children of `parent`.
    pub fn index_of(&self, parent: ObjectId, child: ObjectId) -> Option<usize> {
        self.objects
            .get(parent)?
            .children
            .iter()
            .position(|&c| c == child)
    }

    /// Adds `child` as the last graph child of `parent`.
    ///
    /// A child that already has a parent is removed from it first.
    pub fn add(&mut self, parent: ObjectId, child: ObjectId) -> Result<()> {
        let end = self.children(parent)?.len();
        self.insert_at(parent, child, end)
    }

    /// Splices `child` into the graph children of `parent` at `index`.
    ///
    /// Existing children at or after `index` shift one slot right. A child
    /// that already has a parent is removed from it first; `index` refers to
    /// the child list after that removal and is clamped to its length.
    pub fn insert_at(&mut self, parent: ObjectId, child: ObjectId, index: usize) -> Result<()> {
        self.validate_link(parent, child)?;

        if let Some(old) = self.object(child)?.parent {
            if let Some(old) = self.objects.get_mut(old) {
                old.children.retain(|&c| c != child);
            }
        }

        let siblings = &mut self.object_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.object_mut(child)?.parent = Some(parent);
        trace!("Linked {child:?} under {parent:?} at {index}");
        Ok(())
    }

    /// Removes `child` from the graph children of `parent`.
    ///
    /// Returns `false` if `child` was not a child of `parent`.
    pub fn remove_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<bool> {
        let Some(index) = self.index_of(parent, child) else {
            return Ok(false);
        };
        self.object_mut(parent)?.children.remove(index);
        self.object_mut(child)?.parent = None;
        trace!("Unlinked {child:?} from {parent:?}");
        Ok(true)
    }

    /// Depth-first, pre-order walk of the graph below (and including) `root`.
    pub fn traverse(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(object) = self.objects.get(id) else {
                continue;
            };
            order.push(id);
            stack.extend(object.children.iter().rev());
        }
        order
    }

    fn validate_link(&self, parent: ObjectId, child: ObjectId) -> Result<()> {
        let (p, c) = (self.object(parent)?, self.object(child)?);
        if !p.kind().is_graph() || !c.kind().is_graph() {
            return Err(ReconcileError::InvalidHierarchy(format!(
                "{} and {} are not both graph objects",
                p.class(),
                c.class()
            )));
        }
        // Walk up from the parent; meeting the child would close a cycle.
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(ReconcileError::InvalidHierarchy(format!(
                    "{} cannot be added below itself",
                    c.class()
                )));
            }
            cursor = self.objects.get(id).and_then(|o| o.parent);
        }
        Ok(())
    }
}
