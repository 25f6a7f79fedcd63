//! Declared element properties
//!
//! A tree node carries the properties its element declared. Most are written
//! onto the live object by the [`apply`] module; a handful of reserved keys
//! configure how the node itself behaves.

pub mod apply;
pub mod path;

use std::fmt;

use crate::attach::Attach;
use crate::foundation::collections::ObjectId;
use crate::object::Value;

pub use apply::{apply_prop, apply_props};
pub use path::{resolve, resolve_leaf, Owner, Resolved, PATH_SEPARATOR};

/// Ordered construction arguments, used only at first commit
pub const ARGS: &str = "args";
/// Attach slot descriptor
pub const ATTACH: &str = "attach";
/// Pre-built object for opaque nodes
pub const OBJECT: &str = "object";
/// Disposal flag; `null` or `false` suppresses disposal on removal
pub const DISPOSE: &str = "dispose";

/// Keys that configure the node and are never written onto its object
pub const RESERVED_KEYS: &[&str] = &[ARGS, ATTACH, OBJECT, DISPOSE, "children", "key", "ref"];

/// Whether `key` is reserved
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// A single declared property
#[derive(Clone)]
pub enum Prop {
    /// A plain value
    Value(Value),
    /// An attach descriptor (only meaningful under the `attach` key)
    Attach(Attach),
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => v.fmt(f),
            Self::Attach(a) => a.fmt(f),
        }
    }
}

impl From<Value> for Prop {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

macro_rules! prop_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Prop {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

prop_from_value!(bool, f64, f32, i32, &str, String, ObjectId);

impl From<Attach> for Prop {
    fn from(attach: Attach) -> Self {
        Self::Attach(attach)
    }
}

/// Declared properties of one node, in declaration order
#[derive(Clone, Debug, Default)]
pub struct Props {
    entries: Vec<(String, Prop)>,
}

impl Props {
    /// Empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Property set holding only an empty `args` list
    pub fn args_only() -> Self {
        Self::new().with(ARGS, Value::list([]))
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, prop: impl Into<Prop>) -> Self {
        self.set(key, prop);
        self
    }

    /// Insert or replace a property, keeping its original position on replace
    pub fn set(&mut self, key: impl Into<String>, prop: impl Into<Prop>) -> Option<Prop> {
        let key = key.into();
        let prop = prop.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, prop)),
            None => {
                self.entries.push((key, prop));
                None
            }
        }
    }

    /// Remove a property
    pub fn remove(&mut self, key: &str) -> Option<Prop> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Look up a property
    pub fn get(&self, key: &str) -> Option<&Prop> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }

    /// Look up a plain-valued property
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.get(key)? {
            Prop::Value(v) => Some(v),
            Prop::Attach(_) => None,
        }
    }

    /// Whether the property is declared
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of declared properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is declared
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All declared properties
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prop)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Non-reserved, plain-valued properties: the ones written onto the object
    pub fn declared(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter().filter_map(|(k, p)| match p {
            Prop::Value(v) if !is_reserved(k) => Some((k, v)),
            _ => None,
        })
    }

    /// Construction arguments
    pub fn args(&self) -> Vec<Value> {
        match self.value(ARGS) {
            Some(Value::List(items)) => items.items(),
            Some(Value::Null) | None => Vec::new(),
            Some(single) => vec![single.clone()],
        }
    }

    /// Attach descriptor; a non-empty string is a slot path
    pub fn attach(&self) -> Option<Attach> {
        match self.get(ATTACH)? {
            Prop::Attach(a) => Some(a.clone()),
            Prop::Value(Value::Text(path)) if !path.is_empty() => Some(Attach::Path(path.clone())),
            Prop::Value(_) => None,
        }
    }

    /// Pre-built object for opaque nodes
    pub fn object(&self) -> Option<ObjectId> {
        self.value(OBJECT)?.as_object()
    }

    /// Whether disposal on removal was explicitly suppressed
    pub fn dispose_suppressed(&self) -> bool {
        matches!(self.value(DISPOSE), Some(Value::Null | Value::Bool(false)))
    }
}
