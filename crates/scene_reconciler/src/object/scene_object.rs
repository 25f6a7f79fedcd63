//! Scene objects
//!
//! A [`SceneObject`] is the live, mutable object a committed tree node stands
//! for. It has a class name, a kind that decides how it participates in the
//! scene, and a bag of named fields.

use std::collections::BTreeMap;

use crate::foundation::collections::ObjectId;

use super::value::Value;

/// How an object participates in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Member of the graph hierarchy (has a parent and ordered children)
    Graph,
    /// Geometry-like resource, attached to its owner as `geometry` by default
    Geometry,
    /// Material-like resource, attached to its owner as `material` by default
    Material,
    /// Any other resource; only ever installed through an explicit attach
    Resource,
}

impl ObjectKind {
    /// Whether the object takes part in parent/child graph membership
    pub fn is_graph(self) -> bool {
        self == Self::Graph
    }
}

/// A live scene object
#[derive(Debug, Clone)]
pub struct SceneObject {
    class: String,
    kind: ObjectKind,
    fields: BTreeMap<String, Value>,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
}

impl SceneObject {
    /// Create an object with no fields
    pub fn new(class: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            class: class.into(),
            kind,
            fields: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder-style field initialisation
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Class name the object was constructed from
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The object's kind
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Field value, `Null` when the field does not exist
    pub fn field(&self, name: &str) -> Value {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Whether the field exists
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Assign a field, creating it if needed; returns the previous value
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) -> Value {
        self.fields.insert(name.into(), value).unwrap_or_default()
    }

    /// Iterate the fields in name order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Graph parent, if any
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Graph children in order
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }
}
