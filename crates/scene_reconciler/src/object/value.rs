//! Property values
//!
//! [`Value`] is what declared properties carry and what scene object fields
//! hold. Scalars are stored by value. Lists and math values are shared
//! handles, so writing through one handle is visible to every holder, and
//! scene objects are referenced by their arena id.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::foundation::collections::ObjectId;
use crate::foundation::math::{Color, Euler, Quat, Vec2, Vec3, Vec4};

use super::math_value::MathValue;

/// A property value
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean flag
    Bool(bool),
    /// Number
    Number(f64),
    /// String
    Text(String),
    /// Shared ordered sequence
    List(ListRef),
    /// Shared settable math value
    Math(MathRef),
    /// Reference to a scene object
    Object(ObjectId),
}

impl Value {
    /// Build a list value
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(ListRef::new(items.into_iter().collect()))
    }

    /// Build a math value
    pub fn math(value: MathValue) -> Self {
        Self::Math(MathRef::new(value))
    }

    /// Build a 2D vector value
    pub fn vector2(x: f32, y: f32) -> Self {
        Self::math(MathValue::Vector2(Vec2::new(x, y)))
    }

    /// Build a 3D vector value
    pub fn vector3(x: f32, y: f32, z: f32) -> Self {
        Self::math(MathValue::Vector3(Vec3::new(x, y, z)))
    }

    /// Build a 4D vector value
    pub fn vector4(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self::math(MathValue::Vector4(Vec4::new(x, y, z, w)))
    }

    /// Build an Euler rotation value
    pub fn euler(x: f32, y: f32, z: f32) -> Self {
        Self::math(MathValue::Euler(Euler::new(x, y, z)))
    }

    /// Build an identity quaternion value
    pub fn quaternion_identity() -> Self {
        Self::math(MathValue::Quaternion(Quat::identity()))
    }

    /// Build a colour value from a `0xRRGGBB` code
    pub fn color(hex: u32) -> Self {
        Self::math(MathValue::Color(Color::from_hex(hex)))
    }

    /// Name of the value's category, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::List(_) => "list",
            Self::Math(m) => m.try_get().map_or("math", |v| v.type_name()),
            Self::Object(_) => "object",
        }
    }

    /// Whether the value is absent
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The number, if this is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The string, if this is one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The list handle, if this is one
    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// The math handle, if this is one
    pub fn as_math(&self) -> Option<&MathRef> {
        match self {
            Self::Math(m) => Some(m),
            _ => None,
        }
    }

    /// The object id, if this references an object
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether both values are the same shared handle (or equal scalars)
    pub fn same_ref(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => a.ptr_eq(b),
            (Self::Math(a), Self::Math(b)) => a.ptr_eq(b),
            _ => self == other,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a.ptr_eq(b) || a.items() == b.items(),
            (Self::Math(a), Self::Math(b)) => a.ptr_eq(b) || a.get() == b.get(),
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Self::Object(id)
    }
}

impl From<MathValue> for Value {
    fn from(m: MathValue) -> Self {
        Self::math(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(ListRef::new(items))
    }
}

/// Shared handle to an ordered sequence of values
#[derive(Clone, Default)]
pub struct ListRef(Rc<RefCell<Vec<Value>>>);

impl ListRef {
    /// Wrap a vector in a new shared list
    pub fn new(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether the list has no slots
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Value at `index`, `Null` past the end
    pub fn get(&self, index: usize) -> Value {
        self.0.borrow().get(index).cloned().unwrap_or_default()
    }

    /// Write `value` at `index`, padding with `Null` past the end
    pub fn set(&self, index: usize, value: Value) {
        let mut items = self.0.borrow_mut();
        if index >= items.len() {
            items.resize(index + 1, Value::Null);
        }
        items[index] = value;
    }

    /// Snapshot of the current items
    pub fn items(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// Whether every slot is empty
    pub fn is_cleared(&self) -> bool {
        self.0.borrow().iter().all(Value::is_null)
    }

    /// Whether both handles share the same list
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}

/// Shared handle to a settable math value
#[derive(Clone)]
pub struct MathRef(Rc<RefCell<MathValue>>);

impl MathRef {
    /// Wrap a math value in a new shared handle
    pub fn new(value: MathValue) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Current state
    pub fn get(&self) -> MathValue {
        *self.0.borrow()
    }

    /// Current state, or `None` while the value is being mutated
    pub fn try_get(&self) -> Option<MathValue> {
        self.0.try_borrow().ok().map(|v| *v)
    }

    /// Mutate the value in place
    pub fn update<R>(&self, f: impl FnOnce(&mut MathValue) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Whether both handles share the same value
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MathRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.borrow().fmt(f)
    }
}
