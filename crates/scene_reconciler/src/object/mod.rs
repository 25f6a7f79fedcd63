//! Scene object model
//!
//! The mutable object graph the reconciler drives: an arena of
//! [`SceneObject`]s, the [`Value`]s their fields hold, and the settable
//! [`MathValue`]s behind transform, colour and layer properties.

pub mod math_value;
pub mod scene_object;
pub mod store;
pub mod value;

pub use math_value::{Capabilities, MathValue};
pub use scene_object::{ObjectKind, SceneObject};
pub use store::ObjectStore;
pub use value::{ListRef, MathRef, Value};
