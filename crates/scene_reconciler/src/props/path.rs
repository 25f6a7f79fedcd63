//! Dashed property paths
//!
//! A property key such as `material-color` or `position-x` addresses a
//! member nested inside the object the property is declared on. Resolving a
//! key yields where to write (`root` + `key`) and what currently lives there
//! (`target`).

use crate::error::{ReconcileError, Result};
use crate::foundation::collections::ObjectId;
use crate::object::{Capabilities, ListRef, MathRef, ObjectStore, Value};

/// Separator between path segments
pub const PATH_SEPARATOR: char = '-';

/// Something a resolved key can be written into
#[derive(Debug, Clone)]
pub enum Owner {
    /// A scene object field
    Object(ObjectId),
    /// A math value component
    Math(MathRef),
    /// A list slot
    List(ListRef),
}

impl PartialEq for Owner {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Math(a), Self::Math(b)) => a.ptr_eq(b),
            (Self::List(a), Self::List(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Owner {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(id) => Some(Self::Object(*id)),
            Value::Math(m) => Some(Self::Math(m.clone())),
            Value::List(l) => Some(Self::List(l.clone())),
            _ => None,
        }
    }

    /// Current value under `key`
    pub fn get(&self, store: &ObjectStore, key: &str) -> Result<Value> {
        match self {
            Self::Object(id) => store.field(*id, key),
            Self::Math(m) => Ok(m.get().field(key).unwrap_or_default()),
            Self::List(l) => Ok(l.get(list_index(key)?)),
        }
    }

    /// Plain assignment of `value` under `key`
    pub fn set(&self, store: &mut ObjectStore, key: &str, value: Value) -> Result<()> {
        match self {
            Self::Object(id) => store.set_field(*id, key, value).map(drop),
            Self::Math(m) => m.update(|math| math.set_field(key, &value)),
            Self::List(l) => {
                l.set(list_index(key)?, value);
                Ok(())
            }
        }
    }
}

fn list_index(key: &str) -> Result<usize> {
    key.parse()
        .map_err(|_| ReconcileError::invalid_value("list slot", format!("`{key}` is not an index")))
}

/// Outcome of resolving a property key against an object
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Where a plain assignment of `key` goes
    pub root: Owner,
    /// Key to assign on `root`
    pub key: String,
    /// Current value at the resolved leaf
    pub target: Value,
}

impl Resolved {
    /// Whether the target can be mutated in place instead of reassigned
    pub fn target_is_settable(&self) -> bool {
        is_settable(&self.target)
    }
}

fn is_settable(value: &Value) -> bool {
    value
        .as_math()
        .is_some_and(|m| m.get().capabilities().contains(Capabilities::SET))
}

/// Resolve `key` against `object` for property application.
///
/// Plain keys resolve to the object itself. Dashed keys are walked segment by
/// segment; when the leaf can be mutated in place the root stays at `object`
/// (the caller mutates `target` directly), otherwise the root is rewound to
/// the leaf's owner so the caller assigns the last segment there.
pub fn resolve(store: &ObjectStore, object: ObjectId, key: &str) -> Result<Resolved> {
    let leaf = resolve_leaf(store, object, key)?;
    if key.contains(PATH_SEPARATOR) && is_settable(&leaf.target) {
        return Ok(Resolved {
            root: Owner::Object(object),
            key: key.to_owned(),
            target: leaf.target,
        });
    }
    Ok(leaf)
}

/// Resolve `key` against `object`, always rewinding to the leaf's owner.
///
/// This is the slot form used when installing values: the returned root and
/// key address the exact member the path names.
pub fn resolve_leaf(store: &ObjectStore, object: ObjectId, key: &str) -> Result<Resolved> {
    let unresolved = |segment: &str| ReconcileError::UnresolvedPath {
        path: key.to_owned(),
        segment: segment.to_owned(),
    };

    let mut segments = key.split(PATH_SEPARATOR);
    let mut leaf = segments.next().unwrap_or_default();
    let mut owner = Owner::Object(object);
    for segment in segments {
        let next = owner.get(store, leaf)?;
        owner = Owner::from_value(&next).ok_or_else(|| unresolved(leaf))?;
        leaf = segment;
    }
    let target = owner.get(store, leaf).map_err(|err| match err {
        ReconcileError::InvalidValue { .. } => unresolved(leaf),
        other => other,
    })?;

    Ok(Resolved {
        root: owner,
        key: leaf.to_owned(),
        target,
    })
}

/// Split an indexed slot path such as `material-1` into (`material`, 1)
pub fn split_index(path: &str) -> Option<(&str, usize)> {
    let (container, index) = path.rsplit_once(PATH_SEPARATOR)?;
    if container.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((container, index.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{ObjectKind, SceneObject};

    fn mesh_with_material(store: &mut ObjectStore) -> (ObjectId, ObjectId) {
        let material = store.insert(
            SceneObject::new("MeshStandardMaterial", ObjectKind::Material)
                .with_field("color", Value::color(0xffffff))
                .with_field("opacity", 1.0),
        );
        let mesh = store.insert(
            SceneObject::new("Mesh", ObjectKind::Graph)
                .with_field("position", Value::vector3(0.0, 0.0, 0.0))
                .with_field("material", material)
                .with_field("visible", true),
        );
        (mesh, material)
    }

    #[test]
    fn test_plain_key_resolves_on_object() {
        let mut store = ObjectStore::new();
        let (mesh, _) = mesh_with_material(&mut store);

        let resolved = resolve(&store, mesh, "visible").unwrap();
        assert_eq!(resolved.root, Owner::Object(mesh));
        assert_eq!(resolved.key, "visible");
        assert_eq!(resolved.target, Value::Bool(true));
    }

    #[test]
    fn test_settable_leaf_keeps_root() {
        let mut store = ObjectStore::new();
        let (mesh, material) = mesh_with_material(&mut store);

        let resolved = resolve(&store, mesh, "material-color").unwrap();
        assert_eq!(resolved.root, Owner::Object(mesh));
        assert!(resolved.target_is_settable());
        assert!(resolved
            .target
            .same_ref(&store.field(material, "color").unwrap()));
    }

    #[test]
    fn test_atomic_leaf_rewinds_root() {
        let mut store = ObjectStore::new();
        let (mesh, material) = mesh_with_material(&mut store);

        let resolved = resolve(&store, mesh, "material-opacity").unwrap();
        assert_eq!(resolved.root, Owner::Object(material));
        assert_eq!(resolved.key, "opacity");
        assert_eq!(resolved.target, Value::Number(1.0));

        let component = resolve(&store, mesh, "position-x").unwrap();
        assert!(matches!(component.root, Owner::Math(_)));
        assert_eq!(component.key, "x");
        assert_eq!(component.target, Value::Number(0.0));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut store = ObjectStore::new();
        let (mesh, _) = mesh_with_material(&mut store);

        for key in ["material-opacity", "material-color", "position-y", "visible"] {
            assert_eq!(resolve(&store, mesh, key).unwrap(), resolve(&store, mesh, key).unwrap());
        }
    }

    #[test]
    fn test_unreachable_segment_errors() {
        let mut store = ObjectStore::new();
        let (mesh, _) = mesh_with_material(&mut store);

        let err = resolve(&store, mesh, "geometry-width").unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::UnresolvedPath { segment, .. } if segment == "geometry"
        ));
    }

    #[test]
    fn test_split_index() {
        assert_eq!(split_index("material-1"), Some(("material", 1)));
        assert_eq!(split_index("userData-lights-12"), Some(("userData-lights", 12)));
        assert_eq!(split_index("material"), None);
        assert_eq!(split_index("material-x"), None);
        assert_eq!(split_index("-3"), None);
    }
}
