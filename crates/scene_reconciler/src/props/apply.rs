//! Property application
//!
//! Writes declared properties onto a live object. Settable targets are
//! mutated in place; everything else is assigned. The strategy order is:
//!
//! 1. exact-type copy (keeps the target's identity),
//! 2. list expansion into positional `set` arguments,
//! 3. uniform scalar for non-colour targets,
//! 4. single-argument `set`.
//!
//! Errors from the underlying mutation propagate unchanged.

use log::trace;

use crate::error::Result;
use crate::foundation::collections::ObjectId;
use crate::object::{Capabilities, MathRef, ObjectStore, Value};

use super::path::{resolve, Resolved};
use super::{is_reserved, Props};

/// Apply every declared, non-reserved property of `props` to `object`.
pub fn apply_props(store: &mut ObjectStore, object: ObjectId, props: &Props) -> Result<()> {
    for (key, value) in props.declared() {
        apply_prop(store, object, key, value)?;
    }
    Ok(())
}

/// Apply a single property to `object`. Reserved keys are ignored.
pub fn apply_prop(
    store: &mut ObjectStore,
    object: ObjectId,
    key: &str,
    value: &Value,
) -> Result<()> {
    if is_reserved(key) {
        return Ok(());
    }
    let Resolved { root, key, target } = resolve(store, object, key)?;
    match target.as_math() {
        Some(math) if math.get().capabilities().contains(Capabilities::SET) => {
            trace!("Mutating {key} in place on {object:?}");
            mutate_in_place(math, value)
        }
        _ => root.set(store, &key, value.clone()),
    }
}

fn mutate_in_place(target: &MathRef, value: &Value) -> Result<()> {
    let current = target.get();
    let capabilities = current.capabilities();

    if let Value::Math(source) = value {
        if source.ptr_eq(target) {
            return Ok(());
        }
        let source = source.get();
        if capabilities.contains(Capabilities::COPY) && current.same_type(&source) {
            return target.update(|t| t.copy_from(&source));
        }
    }

    if let Value::List(items) = value {
        let args = items.items();
        return target.update(|t| t.set(&args));
    }

    if !current.is_color() && capabilities.contains(Capabilities::SET_SCALAR) {
        if let Some(scalar) = value.as_number() {
            return target.update(|t| t.set_scalar(scalar as f32));
        }
    }

    target.update(|t| t.set(std::slice::from_ref(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconcileError;
    use crate::foundation::math::{Color, Euler, EulerOrder, Vec2};
    use crate::object::{MathValue, ObjectKind, SceneObject};
    use approx::assert_relative_eq;

    fn sprite(store: &mut ObjectStore) -> ObjectId {
        store.insert(
            SceneObject::new("Sprite", ObjectKind::Graph)
                .with_field("center", Value::vector2(0.5, 0.5))
                .with_field("scale", Value::vector3(1.0, 1.0, 1.0))
                .with_field("rotation", Value::euler(0.0, 0.0, 0.0))
                .with_field("color", Value::color(0xffffff))
                .with_field("name", ""),
        )
    }

    #[test]
    fn test_plain_assignment() {
        let mut store = ObjectStore::new();
        let object = sprite(&mut store);

        apply_prop(&mut store, object, "name", &Value::from("hero")).unwrap();
        apply_prop(&mut store, object, "custom", &Value::from(3)).unwrap();
        assert_eq!(store.field(object, "name").unwrap(), Value::from("hero"));
        assert_eq!(store.field(object, "custom").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_copy_preserves_identity() {
        let mut store = ObjectStore::new();
        let object = sprite(&mut store);
        let original = store.field(object, "center").unwrap();

        let declared = Value::vector2(2.0, 3.0);
        apply_prop(&mut store, object, "center", &declared).unwrap();

        let current = store.field(object, "center").unwrap();
        assert!(current.same_ref(&original));
        assert!(!current.same_ref(&declared));
        assert_eq!(original, Value::vector2(2.0, 3.0));
    }

    #[test]
    fn test_copy_carries_full_state() {
        let mut store = ObjectStore::new();
        let object = sprite(&mut store);

        let euler = Euler::new(0.1, 0.2, 0.3).with_order(EulerOrder::Zyx);
        let declared = Value::math(MathValue::Euler(euler));
        apply_prop(&mut store, object, "rotation", &declared).unwrap();
        let rotation = store.field(object, "rotation").unwrap().as_math().unwrap().get();
        assert_eq!(
            rotation,
            MathValue::Euler(Euler::new(0.1, 0.2, 0.3).with_order(EulerOrder::Zyx))
        );
    }

    #[test]
    fn test_list_spreads_into_set() {
        let mut store = ObjectStore::new();
        let object = sprite(&mut store);

        let args = Value::list([Value::from(1), Value::from(2), Value::from(3)]);
        apply_prop(&mut store, object, "scale", &args).unwrap();
        assert_eq!(store.field(object, "scale").unwrap(), Value::vector3(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_scalar_applies_to_every_component() {
        let mut store = ObjectStore::new();
        let object = sprite(&mut store);

        apply_prop(&mut store, object, "center", &Value::from(2)).unwrap();
        let MathValue::Vector2(center) =
            store.field(object, "center").unwrap().as_math().unwrap().get()
        else {
            panic!("center is not a Vector2");
        };
        assert_eq!(center, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_scalar_on_color_is_a_colour_code() {
        let mut store = ObjectStore::new();
        let object = sprite(&mut store);

        apply_prop(&mut store, object, "color", &Value::from(0xff0000)).unwrap();
        let MathValue::Color(color) =
            store.field(object, "color").unwrap().as_math().unwrap().get()
        else {
            panic!("color is not a Color");
        };
        assert_eq!(color, Color::rgb(1.0, 0.0, 0.0));

        apply_prop(&mut store, object, "color", &Value::from("#0000ff")).unwrap();
        assert_eq!(store.field(object, "color").unwrap(), Value::color(0x0000ff));
    }

    #[test]
    fn test_component_path_assigns_number() {
        let mut store = ObjectStore::new();
        let object = sprite(&mut store);

        apply_prop(&mut store, object, "scale-y", &Value::from(4.5)).unwrap();
        let scale = store.field(object, "scale").unwrap();
        let MathValue::Vector3(v) = scale.as_math().unwrap().get() else {
            panic!("scale is not a Vector3");
        };
        assert_relative_eq!(v.y, 4.5);
        assert_relative_eq!(v.x, 1.0);
    }

    #[test]
    fn test_reserved_keys_skipped() {
        let mut store = ObjectStore::new();
        let object = sprite(&mut store);
        let props = Props::args_only()
            .with("attach", "material")
            .with("dispose", Value::Null)
            .with("name", "kept");

        apply_props(&mut store, object, &props).unwrap();
        assert!(!store.get(object).unwrap().has_field("attach"));
        assert!(!store.get(object).unwrap().has_field("args"));
        assert_eq!(store.field(object, "name").unwrap(), Value::from("kept"));
    }

    #[test]
    fn test_malformed_value_propagates() {
        let mut store = ObjectStore::new();
        let object = sprite(&mut store);

        let declared = Value::list([Value::from(1)]);
        let err = apply_prop(&mut store, object, "scale", &declared).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidValue { .. }));

        let err = apply_prop(&mut store, object, "rotation", &Value::from(1)).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidValue { .. }));
    }
}
