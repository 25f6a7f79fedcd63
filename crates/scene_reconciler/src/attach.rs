//! Attach slots
//!
//! Some children are not graph members but are installed into a named slot
//! on their parent object, such as a geometry or material on a mesh. The
//! [`AttachmentManager`] installs them, remembers what the slot held before,
//! and restores it on detach.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, trace};

use crate::error::Result;
use crate::foundation::collections::ObjectId;
use crate::object::{ObjectStore, Value};
use crate::props::path::{resolve_leaf, split_index};

/// Reversal callback returned by an installer
pub type Detach = Box<dyn FnOnce(&mut ObjectStore)>;

/// Custom installer: receives `(store, parent, child)` and returns its reversal
pub type Installer = dyn Fn(&mut ObjectStore, ObjectId, ObjectId) -> Result<Detach>;

/// How a child is attached to its parent
#[derive(Clone)]
pub enum Attach {
    /// Dashed slot path on the parent, e.g. `material` or `material-1`
    Path(String),
    /// Installer / uninstaller pair
    Installer(Rc<Installer>),
}

impl Attach {
    /// Attach into the slot named by `path`
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Attach through a custom installer
    pub fn installer(
        install: impl Fn(&mut ObjectStore, ObjectId, ObjectId) -> Result<Detach> + 'static,
    ) -> Self {
        Self::Installer(Rc::new(install))
    }
}

impl fmt::Debug for Attach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Installer(_) => f.write_str("Installer(..)"),
        }
    }
}

enum Record {
    Previous(Value),
    Reversal(Detach),
}

/// Installs children into attach slots and undoes it
///
/// Bookkeeping lives in side tables keyed by object identity rather than on
/// the objects themselves.
#[derive(Default)]
pub struct AttachmentManager {
    records: HashMap<ObjectId, Record>,
    containers: HashMap<(ObjectId, String), Value>,
}

impl fmt::Debug for AttachmentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentManager")
            .field("attached", &self.records.len())
            .field("containers", &self.containers.len())
            .finish()
    }
}

impl AttachmentManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `child` is currently attached
    pub fn is_attached(&self, child: ObjectId) -> bool {
        self.records.contains_key(&child)
    }

    /// Install `child` into `parent` as described by `attach`
    pub fn attach(
        &mut self,
        store: &mut ObjectStore,
        parent: ObjectId,
        child: ObjectId,
        attach: &Attach,
    ) -> Result<()> {
        let record = match attach {
            Attach::Path(path) => {
                if let Some((container, _)) = split_index(path) {
                    self.ensure_list(store, parent, container)?;
                }
                let slot = resolve_leaf(store, parent, path)?;
                slot.root.set(store, &slot.key, Value::Object(child))?;
                debug!("Attached {child:?} to {parent:?} at `{path}`");
                Record::Previous(slot.target)
            }
            Attach::Installer(install) => {
                let reversal = install(store, parent, child)?;
                debug!("Attached {child:?} to {parent:?} through an installer");
                Record::Reversal(reversal)
            }
        };
        self.records.insert(child, record);
        Ok(())
    }

    /// Undo the attachment of `child` to `parent`
    pub fn detach(
        &mut self,
        store: &mut ObjectStore,
        parent: ObjectId,
        child: ObjectId,
        attach: &Attach,
    ) -> Result<()> {
        let Some(record) = self.records.remove(&child) else {
            trace!("{child:?} has no attachment to undo");
            return Ok(());
        };
        match (record, attach) {
            (Record::Previous(previous), Attach::Path(path)) => {
                let slot = resolve_leaf(store, parent, path)?;
                slot.root.set(store, &slot.key, previous)?;
                if let Some((container, _)) = split_index(path) {
                    self.restore_list(store, parent, container)?;
                }
                debug!("Detached {child:?} from {parent:?} at `{path}`");
            }
            (Record::Reversal(reversal), _) => {
                reversal(store);
                debug!("Detached {child:?} from {parent:?} through its reversal");
            }
            (Record::Previous(_), Attach::Installer(_)) => {
                debug!("Attach of {child:?} changed kind; leaving its slot as is");
            }
        }
        Ok(())
    }

    /// Drop all bookkeeping that refers to a disposed object
    pub fn forget(&mut self, object: ObjectId) {
        self.records.remove(&object);
        self.containers.retain(|(owner, _), _| *owner != object);
    }

    fn ensure_list(
        &mut self,
        store: &mut ObjectStore,
        parent: ObjectId,
        container: &str,
    ) -> Result<()> {
        let slot = resolve_leaf(store, parent, container)?;
        if slot.target.as_list().is_some() {
            return Ok(());
        }
        slot.root.set(store, &slot.key, Value::list([]))?;
        self.containers
            .entry((parent, container.to_owned()))
            .or_insert(slot.target);
        Ok(())
    }

    fn restore_list(
        &mut self,
        store: &mut ObjectStore,
        parent: ObjectId,
        container: &str,
    ) -> Result<()> {
        let key = (parent, container.to_owned());
        if !self.containers.contains_key(&key) {
            return Ok(());
        }
        let slot = resolve_leaf(store, parent, container)?;
        let cleared = slot.target.as_list().map_or(true, |list| list.is_cleared());
        if cleared {
            if let Some(previous) = self.containers.remove(&key) {
                slot.root.set(store, &slot.key, previous)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{ObjectKind, SceneObject};

    fn mesh(store: &mut ObjectStore) -> ObjectId {
        let mesh = SceneObject::new("Mesh", ObjectKind::Graph)
            .with_field("material", Value::from("default"));
        store.insert(mesh)
    }

    fn material(store: &mut ObjectStore) -> ObjectId {
        store.insert(SceneObject::new("MeshBasicMaterial", ObjectKind::Material))
    }

    #[test]
    fn test_path_attach_restores_previous_value() {
        let mut store = ObjectStore::new();
        let mut manager = AttachmentManager::new();
        let parent = mesh(&mut store);
        let child = material(&mut store);
        let attach = Attach::path("material");

        manager.attach(&mut store, parent, child, &attach).unwrap();
        assert_eq!(store.field(parent, "material").unwrap(), Value::Object(child));
        assert!(manager.is_attached(child));

        manager.detach(&mut store, parent, child, &attach).unwrap();
        assert_eq!(store.field(parent, "material").unwrap(), Value::from("default"));
        assert!(!manager.is_attached(child));
    }

    #[test]
    fn test_nested_path_attach() {
        let mut store = ObjectStore::new();
        let mut manager = AttachmentManager::new();
        let parent = mesh(&mut store);
        let owner = material(&mut store);
        store.set_field(parent, "skin", Value::Object(owner)).unwrap();
        let texture = store.insert(SceneObject::new("Texture", ObjectKind::Resource));
        let attach = Attach::path("skin-map");

        manager.attach(&mut store, parent, texture, &attach).unwrap();
        assert_eq!(store.field(owner, "map").unwrap(), Value::Object(texture));

        manager.detach(&mut store, parent, texture, &attach).unwrap();
        assert!(store.field(owner, "map").unwrap().is_null());
    }

    #[test]
    fn test_indexed_slots_restore_container_when_cleared() {
        let mut store = ObjectStore::new();
        let mut manager = AttachmentManager::new();
        let parent = mesh(&mut store);
        let first = material(&mut store);
        let second = material(&mut store);
        let (slot0, slot1) = (Attach::path("material-0"), Attach::path("material-1"));

        manager.attach(&mut store, parent, first, &slot0).unwrap();
        manager.attach(&mut store, parent, second, &slot1).unwrap();
        assert_eq!(
            store.field(parent, "material").unwrap(),
            Value::list([Value::Object(first), Value::Object(second)])
        );

        manager.detach(&mut store, parent, first, &slot0).unwrap();
        assert_eq!(
            store.field(parent, "material").unwrap(),
            Value::list([Value::Null, Value::Object(second)])
        );

        manager.detach(&mut store, parent, second, &slot1).unwrap();
        assert_eq!(store.field(parent, "material").unwrap(), Value::from("default"));
    }

    #[test]
    fn test_installer_reversal_runs_on_detach() {
        let mut store = ObjectStore::new();
        let mut manager = AttachmentManager::new();
        let parent = mesh(&mut store);
        let child = material(&mut store);
        let attach = Attach::installer(|store, parent, child| {
            let previous = store.set_field(parent, "override", Value::Object(child))?;
            Ok(Box::new(move |store: &mut ObjectStore| {
                let _ = store.set_field(parent, "override", previous);
            }))
        });

        manager.attach(&mut store, parent, child, &attach).unwrap();
        assert_eq!(store.field(parent, "override").unwrap(), Value::Object(child));

        manager.detach(&mut store, parent, child, &attach).unwrap();
        assert!(store.field(parent, "override").unwrap().is_null());
    }

    #[test]
    fn test_detach_without_attach_is_noop() {
        let mut store = ObjectStore::new();
        let mut manager = AttachmentManager::new();
        let parent = mesh(&mut store);
        let child = material(&mut store);

        manager.detach(&mut store, parent, child, &Attach::path("material")).unwrap();
        assert_eq!(store.field(parent, "material").unwrap(), Value::from("default"));
    }
}
